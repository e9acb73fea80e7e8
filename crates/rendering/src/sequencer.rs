//! Construction sequencer: a one-shot, scripted reveal of the site.
//!
//! The order is fixed -- ground settle, footings, grade beams, floor
//! slabs, walls, windows, doors, roof. Each group declares its start as an
//! offset from the *previous group's start*, so groups overlap slightly on
//! purpose (the stacking effect), plus a per-element stagger, a duration,
//! and an easing. The schedule is plain data and tested without any
//! rendering; the systems below just play it back against the clock.

use bevy::prelude::*;

use crate::ambient::DoorCycle;
use crate::ease::Ease;
use crate::scene_plan::ScenePlan;
use crate::site::{DoorPanel, Ground};

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealGroup {
    GroundSettle,
    Footings,
    GradeBeams,
    FloorSlabs,
    Walls,
    Windows,
    Doors,
    Roof,
}

/// Timing for one group, with `start` already resolved to an absolute
/// timeline position.
#[derive(Debug, Clone, Copy)]
pub struct GroupTiming {
    pub group: RevealGroup,
    pub start: f32,
    pub stagger: f32,
    pub duration: f32,
    pub ease: Ease,
}

#[derive(Debug, Clone)]
pub struct RevealSchedule {
    groups: Vec<GroupTiming>,
}

/// Declared offsets: (group, offset from previous group's start, stagger,
/// duration, ease). Footings bounce, walls and doors pop, the roof lands
/// with a wobble.
const GROUP_TABLE: &[(RevealGroup, f32, f32, f32, Ease)] = &[
    (RevealGroup::GroundSettle, 0.0, 0.0, 1.0, Ease::QuadInOut),
    (RevealGroup::Footings, 0.8, 0.2, 0.3, Ease::BounceOut),
    (RevealGroup::GradeBeams, 0.7, 0.1, 0.3, Ease::QuadOut),
    (RevealGroup::FloorSlabs, 0.6, 0.2, 0.4, Ease::CubicOut),
    (RevealGroup::Walls, 0.7, 0.1, 0.4, Ease::BackOut),
    (RevealGroup::Windows, 0.6, 0.1, 0.3, Ease::CubicOut),
    (RevealGroup::Doors, 0.5, 0.1, 0.4, Ease::BackOut),
    (RevealGroup::Roof, 0.5, 0.0, 0.7, Ease::ElasticOut),
];

impl RevealSchedule {
    /// The standard build sequence with absolute group starts resolved.
    pub fn standard() -> Self {
        let mut groups = Vec::with_capacity(GROUP_TABLE.len());
        let mut cursor = 0.0;
        for &(group, offset, stagger, duration, ease) in GROUP_TABLE {
            cursor += offset;
            groups.push(GroupTiming {
                group,
                start: cursor,
                stagger,
                duration,
                ease,
            });
        }
        Self { groups }
    }

    pub fn timing(&self, group: RevealGroup) -> GroupTiming {
        // The constructor inserts every variant exactly once.
        self.groups
            .iter()
            .copied()
            .find(|t| t.group == group)
            .unwrap_or(GroupTiming {
                group,
                start: 0.0,
                stagger: 0.0,
                duration: 0.0,
                ease: Ease::Linear,
            })
    }

    /// Start time of element `index` within its group.
    pub fn element_start(&self, group: RevealGroup, index: usize) -> f32 {
        let t = self.timing(group);
        t.start + index as f32 * t.stagger
    }

    /// When the last element of the whole sequence finishes, given the
    /// element counts of a plan.
    pub fn total_duration(&self, plan: &ScenePlan) -> f32 {
        let counts = [
            (RevealGroup::GroundSettle, 1),
            (RevealGroup::Footings, plan.pads.len()),
            (RevealGroup::GradeBeams, plan.beams.len()),
            (RevealGroup::FloorSlabs, plan.slabs.len()),
            (RevealGroup::Walls, plan.walls.len()),
            (RevealGroup::Windows, plan.windows.len()),
            (RevealGroup::Doors, plan.doors.len()),
            (RevealGroup::Roof, 1),
        ];
        counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|&(group, n)| {
                let t = self.timing(group);
                self.element_start(group, n - 1) + t.duration
            })
            .fold(0.0, f32::max)
    }
}

// ---------------------------------------------------------------------------
// Components and resources
// ---------------------------------------------------------------------------

/// How an element grows in during its entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStyle {
    /// Rise from a flattened slab (footings, slabs, walls, panes, doors).
    GrowY,
    /// Extend along the long axis (grade beams).
    GrowX,
    /// Inflate from a point (roof).
    GrowUniform,
}

/// Entrance transition for one element; start is absolute timeline time.
/// The element stays hidden until `start`, then its scale follows the
/// easing -- visibility flips in the same frame the transition begins.
#[derive(Component, Debug, Clone, Copy)]
pub struct Reveal {
    pub start: f32,
    pub duration: f32,
    pub ease: Ease,
    pub style: RevealStyle,
}

impl Reveal {
    pub fn progress(&self, elapsed: f32) -> Option<f32> {
        if elapsed < self.start {
            return None;
        }
        if self.duration <= 0.0 {
            return Some(1.0);
        }
        Some(((elapsed - self.start) / self.duration).min(1.0))
    }
}

/// The ground dip-and-return played at the head of the sequence.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundSettle {
    pub start: f32,
    pub duration: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Clock for the one-shot reveal. Reset and restarted by every build.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConstructionTimeline {
    pub elapsed: f32,
    pub total: f32,
    pub state: TimelineState,
}

impl ConstructionTimeline {
    pub fn started(total: f32) -> Self {
        Self {
            elapsed: 0.0,
            total,
            state: TimelineState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TimelineState::Running
    }

    /// Fraction of the sequence played, for progress display.
    pub fn fraction(&self) -> f32 {
        match self.state {
            TimelineState::Idle => 0.0,
            TimelineState::Finished => 1.0,
            TimelineState::Running => {
                if self.total > 0.0 {
                    (self.elapsed / self.total).clamp(0.0, 1.0)
                } else {
                    1.0
                }
            }
        }
    }
}

/// Initial collapsed scale; matches the degenerate scale elements are
/// spawned with so the first revealed frame is continuous.
pub const COLLAPSED_SCALE: f32 = 0.01;

/// Scale driven through an easing: collapsed at progress 0, identity at 1.
/// Back/elastic eases overshoot past 1 in between.
pub fn reveal_scale(ease: Ease, t: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    COLLAPSED_SCALE + (1.0 - COLLAPSED_SCALE) * ease.apply(t)
}

/// Ground settle offset: dips to `-depth` at the midpoint and returns,
/// eased on both halves.
pub fn settle_offset(settle: &GroundSettle, elapsed: f32) -> f32 {
    if elapsed <= settle.start || settle.duration <= 0.0 {
        return 0.0;
    }
    let t = ((elapsed - settle.start) / settle.duration).min(1.0);
    let phase = if t < 0.5 {
        Ease::QuadInOut.apply(t / 0.5)
    } else {
        1.0 - Ease::QuadInOut.apply((t - 0.5) / 0.5)
    };
    -settle.depth * phase
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Advance the running timeline; flips to Finished past the end.
pub fn tick_timeline(time: Res<Time>, mut timeline: ResMut<ConstructionTimeline>) {
    if !timeline.is_running() {
        return;
    }
    timeline.elapsed += time.delta_secs();
    if timeline.elapsed >= timeline.total {
        timeline.elapsed = timeline.total;
        timeline.state = TimelineState::Finished;
        info!("construction sequence complete");
    }
}

/// Play the ground dip at the head of the sequence.
pub fn settle_ground(
    timeline: Res<ConstructionTimeline>,
    mut grounds: Query<(&GroundSettle, &mut Transform), With<Ground>>,
) {
    if timeline.state == TimelineState::Idle {
        return;
    }
    for (settle, mut transform) in &mut grounds {
        transform.translation.y = settle_offset(settle, timeline.elapsed);
    }
}

/// Drive every entrance transition from the timeline clock. Doors arm
/// their ambient open/close cycle the moment their entrance completes.
pub fn apply_reveals(
    mut commands: Commands,
    timeline: Res<ConstructionTimeline>,
    mut elements: Query<(
        Entity,
        &Reveal,
        &mut Transform,
        &mut Visibility,
        Option<&DoorPanel>,
        Option<&DoorCycle>,
    )>,
) {
    if timeline.state == TimelineState::Idle {
        return;
    }

    for (entity, reveal, mut transform, mut visibility, door, cycle) in &mut elements {
        let Some(t) = reveal.progress(timeline.elapsed) else {
            continue;
        };

        // First visible frame coincides with the start of the transition.
        if *visibility != Visibility::Visible {
            *visibility = Visibility::Visible;
        }

        let value = reveal_scale(reveal.ease, t);
        transform.scale = match reveal.style {
            RevealStyle::GrowY => Vec3::new(1.0, value, 1.0),
            RevealStyle::GrowX => Vec3::new(value, 1.0, 1.0),
            RevealStyle::GrowUniform => Vec3::splat(value),
        };

        if t >= 1.0 {
            if let (Some(panel), None) = (door, cycle) {
                commands.entity(entity).insert(DoorCycle::new(panel.closed_z));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::building::BuildingSpec;

    #[test]
    fn test_group_starts_strictly_increase() {
        let schedule = RevealSchedule::standard();
        let mut prev = -1.0;
        for timing in GROUP_TABLE.iter().map(|&(g, ..)| schedule.timing(g)) {
            assert!(
                timing.start > prev,
                "{:?} starts at {} after {}",
                timing.group,
                timing.start,
                prev
            );
            prev = timing.start;
        }
    }

    #[test]
    fn test_starts_are_offsets_from_previous_start() {
        let schedule = RevealSchedule::standard();
        let footings = schedule.timing(RevealGroup::Footings);
        let beams = schedule.timing(RevealGroup::GradeBeams);
        // GradeBeams declares +0.7 from the start (not the end) of Footings.
        assert!((beams.start - (footings.start + 0.7)).abs() < 1e-5);
    }

    #[test]
    fn test_element_stagger() {
        let schedule = RevealSchedule::standard();
        let t = schedule.timing(RevealGroup::Footings);
        for k in 0..5 {
            let expect = t.start + k as f32 * t.stagger;
            assert!((schedule.element_start(RevealGroup::Footings, k) - expect).abs() < 1e-5);
        }
    }

    #[test]
    fn test_groups_overlap_for_large_builds() {
        // With enough footings, the footing group is still revealing when
        // the beams begin: the intended stacking effect.
        let schedule = RevealSchedule::standard();
        let footings = schedule.timing(RevealGroup::Footings);
        let beams = schedule.timing(RevealGroup::GradeBeams);
        let last_footing_end = schedule.element_start(RevealGroup::Footings, 15) + footings.duration;
        assert!(beams.start < last_footing_end);
    }

    #[test]
    fn test_total_duration_covers_every_element() {
        let schedule = RevealSchedule::standard();
        let plan = ScenePlan::new(&BuildingSpec::new(9.0, 3).unwrap());
        let total = schedule.total_duration(&plan);

        let roof = schedule.timing(RevealGroup::Roof);
        assert!(total >= roof.start + roof.duration);

        let windows = schedule.timing(RevealGroup::Windows);
        let last_window =
            schedule.element_start(RevealGroup::Windows, plan.windows.len() - 1) + windows.duration;
        assert!(total >= last_window);
    }

    #[test]
    fn test_reveal_progress_gates_on_start() {
        let reveal = Reveal {
            start: 2.0,
            duration: 0.5,
            ease: Ease::Linear,
            style: RevealStyle::GrowY,
        };
        assert_eq!(reveal.progress(1.9), None);
        assert!((reveal.progress(2.25).unwrap() - 0.5).abs() < 1e-5);
        assert_eq!(reveal.progress(10.0), Some(1.0));
    }

    #[test]
    fn test_reveal_scale_endpoints() {
        for ease in [Ease::BounceOut, Ease::BackOut, Ease::ElasticOut, Ease::CubicOut] {
            assert!((reveal_scale(ease, 0.0) - COLLAPSED_SCALE).abs() < 1e-5);
            assert_eq!(reveal_scale(ease, 1.0), 1.0);
        }
    }

    #[test]
    fn test_settle_dips_and_returns() {
        let settle = GroundSettle {
            start: 0.0,
            duration: 1.0,
            depth: 0.5,
        };
        assert_eq!(settle_offset(&settle, 0.0), 0.0);
        assert!((settle_offset(&settle, 0.5) + 0.5).abs() < 1e-5);
        assert!(settle_offset(&settle, 1.0).abs() < 1e-5);
        assert!(settle_offset(&settle, 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_timeline_fraction() {
        let mut timeline = ConstructionTimeline::started(10.0);
        assert_eq!(timeline.fraction(), 0.0);
        timeline.elapsed = 5.0;
        assert!((timeline.fraction() - 0.5).abs() < 1e-5);
        timeline.state = TimelineState::Finished;
        assert_eq!(timeline.fraction(), 1.0);
    }
}
