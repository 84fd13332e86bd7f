// crates/skyfire_shared/src/sprite.rs
//! Sprite-sheet animation: a timed cycle over index sub-ranges of one shared mesh.

use std::ops::Range;

use crate::mesh::QUAD_INDEX_COUNT;

/// One frame of a sprite animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteFrame {
    /// Seconds on screen.
    pub duration: f32,
    /// First index of this frame in the shared index buffer.
    pub first_index: u32,
    pub index_count: u32,
}

impl SpriteFrame {
    /// Frame `n` of a linear sheet built by [`crate::mesh::sprite_sheet`].
    pub fn sheet(n: u32, duration: f32) -> Self {
        Self {
            duration,
            first_index: n * QUAD_INDEX_COUNT,
            index_count: QUAD_INDEX_COUNT,
        }
    }

    pub fn indices(&self) -> Range<u32> {
        self.first_index..self.first_index + self.index_count
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteAnimation {
    frames: Vec<SpriteFrame>,
    curr_frame_idx: usize,
    last_transit_dt: f32,
    curr_cycle_count: u32,
    /// 0 loops forever.
    max_cycles: u32,
}

impl SpriteAnimation {
    pub fn new(frames: Vec<SpriteFrame>, max_cycles: u32) -> Self {
        assert!(!frames.is_empty(), "sprite animation needs at least one frame");
        Self {
            frames,
            curr_frame_idx: 0,
            last_transit_dt: 0.0,
            curr_cycle_count: 0,
            max_cycles,
        }
    }

    /// `count` frames of equal `duration` laid out left to right on one sheet.
    pub fn uniform(count: u32, duration: f32, max_cycles: u32) -> Self {
        Self::new(
            (0..count).map(|n| SpriteFrame::sheet(n, duration)).collect(),
            max_cycles,
        )
    }

    /// Advances at most one frame per call. Time past the frame boundary
    /// carries into the next frame.
    pub fn update_frame(&mut self, dt: f32) {
        self.last_transit_dt += dt;
        let duration = self.frames[self.curr_frame_idx].duration;
        if self.last_transit_dt < duration {
            return;
        }
        self.last_transit_dt -= duration;
        self.curr_frame_idx += 1;
        if self.curr_frame_idx == self.frames.len() {
            self.curr_frame_idx = 0;
            self.curr_cycle_count += 1;
        }
    }

    pub fn curr_frame(&self) -> &SpriteFrame {
        &self.frames[self.curr_frame_idx]
    }

    pub fn curr_frame_idx(&self) -> usize {
        self.curr_frame_idx
    }

    pub fn curr_cycle_count(&self) -> u32 {
        self.curr_cycle_count
    }

    pub fn frames(&self) -> &[SpriteFrame] {
        &self.frames
    }

    pub fn expired(&self) -> bool {
        self.max_cycles > 0 && self.curr_cycle_count >= self.max_cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_wraps_to_first_frame() {
        let mut anim = SpriteAnimation::uniform(4, 0.15, 0);
        for _ in 0..4 {
            anim.update_frame(0.15);
        }
        assert_eq!(anim.curr_frame_idx(), 0);
        assert_eq!(anim.curr_cycle_count(), 1);
        assert!(!anim.expired());
    }

    #[test]
    fn remainder_carries_into_next_frame() {
        let mut anim = SpriteAnimation::uniform(3, 0.5, 0);
        anim.update_frame(0.75);
        assert_eq!(anim.curr_frame_idx(), 1);
        // 0.25 carried over, so another 0.25 finishes frame 1.
        anim.update_frame(0.25);
        assert_eq!(anim.curr_frame_idx(), 2);
        anim.update_frame(0.25);
        assert_eq!(anim.curr_frame_idx(), 2);
    }

    #[test]
    fn one_shot_expires_after_first_cycle() {
        let mut frames: Vec<_> = (0..5).map(|n| SpriteFrame::sheet(n, 0.25)).collect();
        frames.push(SpriteFrame::sheet(5, 0.5));
        let mut anim = SpriteAnimation::new(frames, 1);

        for _ in 0..5 {
            assert!(!anim.expired());
            anim.update_frame(0.25);
        }
        assert_eq!(anim.curr_frame_idx(), 5);
        anim.update_frame(0.25);
        assert!(!anim.expired());
        anim.update_frame(0.25);
        assert!(anim.expired());
        assert_eq!(anim.curr_cycle_count(), 1);
    }

    #[test]
    fn frame_advances_once_its_duration_is_reached() {
        let frames = vec![SpriteFrame::sheet(0, 0.5), SpriteFrame::sheet(1, 0.5)];
        let mut anim = SpriteAnimation::new(frames, 0);
        anim.update_frame(0.25);
        assert_eq!(anim.curr_frame_idx(), 0);
        anim.update_frame(0.25);
        assert_eq!(anim.curr_frame_idx(), 1);
    }

    #[test]
    fn frame_index_ranges_follow_the_sheet() {
        let anim = SpriteAnimation::uniform(4, 0.15, 0);
        let ranges: Vec<_> = anim.frames().iter().map(|f| f.indices()).collect();
        assert_eq!(ranges, vec![0..6, 6..12, 12..18, 18..24]);
    }
}
