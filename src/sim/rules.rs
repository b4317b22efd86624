//! Collision-response rules for special bodies
//!
//! Dispatch is on the unordered pair of kind labels. Each rule both
//! redirects the ball and puts a floor (or ceiling) on the resulting speed so
//! repeated contacts neither stall the ball nor run away.

use glam::Vec2;

use super::body::{BodyId, BodyKind};

/// What a rule does to the ball it matched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleOutcome {
    /// Ball reached the target zone: remove it and emit a scoring event
    Capture,
    /// Replace the ball's velocity
    SetVelocity(Vec2),
}

/// A matched rule, addressed to the ball it applies to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMatch {
    pub ball: BodyId,
    pub outcome: RuleOutcome,
}

/// The slice of body state a rule needs
#[derive(Debug, Clone, Copy)]
pub struct Participant {
    pub id: BodyId,
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Evaluate the rule table for a new contact. `None` means default contact
/// physics only.
pub fn respond(a: &Participant, b: &Participant) -> Option<RuleMatch> {
    let (ball, other) = if a.kind == BodyKind::Ball {
        (a, b)
    } else if b.kind == BodyKind::Ball {
        (b, a)
    } else {
        return None;
    };

    let outcome = match other.kind {
        BodyKind::TargetZone => RuleOutcome::Capture,
        BodyKind::BouncerTop => {
            RuleOutcome::SetVelocity(Vec2::new(ball.vel.x, (ball.vel.y.abs() * 2.0).max(30.0)))
        }
        BodyKind::BouncerBottom => {
            RuleOutcome::SetVelocity(Vec2::new(ball.vel.x, (ball.vel.y.abs() * -1.5).min(-10.0)))
        }
        BodyKind::Bumper => {
            // Only deflect balls arriving from the upper-right quadrant
            if ball.pos.x < other.pos.x || ball.pos.y > other.pos.y {
                return None;
            }
            RuleOutcome::SetVelocity(Vec2::new(
                (ball.vel.x.abs() * 1.1).max(10.0),
                (ball.vel.y.abs() * -1.1).min(-5.0),
            ))
        }
        _ => return None,
    };

    Some(RuleMatch {
        ball: ball.id,
        outcome,
    })
}
