// crates/skyfire_scene/src/scene.rs

use crate::entity::GameObject;
use crate::storage::Layer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Background,
    Ship,
    Projectile,
    Explosion,
    Gui,
    Text,
}

impl LayerKind {
    /// Back to front.
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Background,
        LayerKind::Ship,
        LayerKind::Projectile,
        LayerKind::Explosion,
        LayerKind::Gui,
        LayerKind::Text,
    ];
}

/// The single level: six fixed layers. The player is created with the scene
/// and stays at the front of the ship layer for the scene's whole life.
#[derive(Debug)]
pub struct Scene {
    background: Layer,
    ships: Layer,
    projectiles: Layer,
    explosions: Layer,
    gui: Layer,
    text: Layer,
}

impl Scene {
    pub fn new(player: GameObject) -> Self {
        Self {
            background: Layer::new(),
            ships: Layer::with_pinned(player),
            projectiles: Layer::new(),
            explosions: Layer::new(),
            gui: Layer::new(),
            text: Layer::new(),
        }
    }

    pub fn push(&mut self, kind: LayerKind, object: GameObject) {
        self.layer_mut(kind).push(object);
    }

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Background => &self.background,
            LayerKind::Ship => &self.ships,
            LayerKind::Projectile => &self.projectiles,
            LayerKind::Explosion => &self.explosions,
            LayerKind::Gui => &self.gui,
            LayerKind::Text => &self.text,
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Background => &mut self.background,
            LayerKind::Ship => &mut self.ships,
            LayerKind::Projectile => &mut self.projectiles,
            LayerKind::Explosion => &mut self.explosions,
            LayerKind::Gui => &mut self.gui,
            LayerKind::Text => &mut self.text,
        }
    }

    /// All layers, back to front.
    pub fn layers(&self) -> [&Layer; 6] {
        [
            &self.background,
            &self.ships,
            &self.projectiles,
            &self.explosions,
            &self.gui,
            &self.text,
        ]
    }

    pub fn layers_mut(&mut self) -> [&mut Layer; 6] {
        [
            &mut self.background,
            &mut self.ships,
            &mut self.projectiles,
            &mut self.explosions,
            &mut self.gui,
            &mut self.text,
        ]
    }

    pub fn player(&self) -> &GameObject {
        // Pinned at construction, never erased.
        self.ships.front().unwrap_or_else(|| unreachable!("ship layer lost its player"))
    }

    pub fn player_mut(&mut self) -> &mut GameObject {
        self.split_ships().0
    }

    /// Player and every other ship, mutably and at once.
    pub fn split_ships(&mut self) -> (&mut GameObject, &mut [GameObject]) {
        self.ships
            .split_front_mut()
            .unwrap_or_else(|| unreachable!("ship layer lost its player"))
    }

    /// Player, enemies and projectiles, for the collision passes.
    pub fn combatants(&mut self) -> (&mut GameObject, &mut [GameObject], &mut Layer) {
        let (player, enemies) = self
            .ships
            .split_front_mut()
            .unwrap_or_else(|| unreachable!("ship layer lost its player"));
        (player, enemies, &mut self.projectiles)
    }

    pub fn object_count(&self) -> usize {
        self.layers().iter().map(|layer| layer.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_come_back_to_front() {
        let mut scene = Scene::new(GameObject::new("player"));
        for kind in LayerKind::ALL {
            scene.push(kind, GameObject::new("marker"));
        }
        let counts: Vec<_> = scene.layers().iter().map(|l| l.len()).collect();
        assert_eq!(counts, vec![1, 2, 1, 1, 1, 1]);
        assert_eq!(scene.object_count(), 7);
    }

    #[test]
    fn player_is_front_of_ships() {
        let mut scene = Scene::new(GameObject::new("player"));
        scene.push(LayerKind::Ship, GameObject::new("enemy"));
        assert_eq!(scene.player().tag.0, "player");

        let (player, enemies) = scene.split_ships();
        assert_eq!(player.tag.0, "player");
        assert_eq!(enemies.len(), 1);

        scene.layer_mut(LayerKind::Ship).erase_if(|_| true);
        assert_eq!(scene.player().tag.0, "player");
    }
}
