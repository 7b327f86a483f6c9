//! Disappearing platform: flickers once touched, then vanishes.

use crate::engine::{PhysicsPort, Visual};
use crate::entity::{BodyId, HazardState, HazardStep};

use super::TickOutcome;

/// Runs one hazard tick.
///
/// Idle hazards do nothing. Armed hazards count up, toggle collision and
/// image every flicker interval, and ask to be destroyed when their lifetime
/// runs out.
pub fn tick<P: PhysicsPort + ?Sized>(
    state: &mut HazardState,
    body: BodyId,
    engine: &mut P,
) -> TickOutcome {
    match state.advance() {
        HazardStep::Dormant | HazardStep::Counting => TickOutcome::Continue,
        HazardStep::Toggled(visible) => {
            engine.set_collidable(body, visible);
            if visible {
                engine.attach_visual(body, Visual::Platform);
            } else {
                engine.detach_all_visuals(body);
            }
            TickOutcome::Continue
        }
        HazardStep::Expired => {
            engine.set_collidable(body, false);
            engine.detach_all_visuals(body);
            TickOutcome::Destroy
        }
    }
}
