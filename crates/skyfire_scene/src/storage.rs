// crates/skyfire_scene/src/storage.rs

use crate::entity::GameObject;

/// Insertion-ordered list of objects. Simulation walks it front to back,
/// rendering back to front.
#[derive(Debug, Default)]
pub struct Layer {
    objects: Vec<GameObject>,
    // The front object can never be erased (the player lives here).
    pinned_front: bool,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_pinned(front: GameObject) -> Self {
        Self {
            objects: vec![front],
            pinned_front: true,
        }
    }

    pub fn push(&mut self, object: GameObject) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn front(&self) -> Option<&GameObject> {
        self.objects.first()
    }

    pub fn get(&self, index: usize) -> Option<&GameObject> {
        self.objects.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, GameObject> {
        self.objects.iter_mut()
    }

    pub(crate) fn split_front_mut(&mut self) -> Option<(&mut GameObject, &mut [GameObject])> {
        self.objects.split_first_mut()
    }

    /// Removes every object for which `erase` returns true, keeping the
    /// relative order of the rest. A pinned front object is skipped.
    /// Returns how many objects were removed.
    pub fn erase_if(&mut self, mut erase: impl FnMut(&mut GameObject) -> bool) -> usize {
        let before = self.objects.len();
        let pinned = self.pinned_front;
        let mut index = 0;
        self.objects.retain_mut(|object| {
            let keep = (pinned && index == 0) || !erase(object);
            index += 1;
            keep
        });
        before - self.objects.len()
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = &'a GameObject;
    type IntoIter = std::slice::Iter<'a, GameObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Layer {
    type Item = &'a mut GameObject;
    type IntoIter = std::slice::IterMut<'a, GameObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(layer: &Layer) -> Vec<&'static str> {
        layer.iter().map(|o| o.tag.0).collect()
    }

    #[test]
    fn erase_keeps_order_of_survivors() {
        let mut layer = Layer::new();
        for tag in ["a", "b", "c", "d"] {
            layer.push(GameObject::new(tag));
        }
        let removed = layer.erase_if(|o| o.tag.0 == "b" || o.tag.0 == "d");
        assert_eq!(removed, 2);
        assert_eq!(tags(&layer), vec!["a", "c"]);
    }

    #[test]
    fn pinned_front_survives_erase() {
        let mut layer = Layer::with_pinned(GameObject::new("player"));
        layer.push(GameObject::new("enemy"));
        let removed = layer.erase_if(|_| true);
        assert_eq!(removed, 1);
        assert_eq!(tags(&layer), vec!["player"]);
    }
}
