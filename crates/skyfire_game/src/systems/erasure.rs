// crates/skyfire_game/src/systems/erasure.rs

use skyfire_scene::Scene;
use skyfire_shared::AudioDevice;
use tracing::trace;

/// Removes every object whose erasure is due and frees its sound source.
/// Objects gated on a sound stay until the device reports it stopped.
pub fn erase_pending<A: AudioDevice>(scene: &mut Scene, audio: &mut A) -> usize {
    let mut erased = 0;
    for layer in scene.layers_mut() {
        erased += layer.erase_if(|obj| {
            if !obj.poll_erase(|source| audio.is_playing(source)) {
                return false;
            }
            if let Some(source) = obj.sound.take() {
                audio.release_source(source);
            }
            trace!(tag = obj.tag.0, "Erased object");
            true
        });
    }
    erased
}
