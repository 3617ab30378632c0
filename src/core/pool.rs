//! Per-clip playback reconciliation.
//!
//! Each frame the pool compares every clip's desired role (derived from the
//! phase and active index) with the role it was last put in.  Transition
//! work (rewinding, unmuting, pausing) only happens when a role changes, so a
//! steady scroll position never restarts or thrashes a clip.

use tracing::debug;

use super::index::select_index;
use super::media::MediaElement;
use super::phase::{Phase, PhaseSample};
use super::tuning::Tuning;

/// What a clip is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRole {
    /// Not active: muted, paused, rewound.
    Parked,
    /// Active outside `Sliding`: silent loop for ambient motion.
    Ambient,
    /// Active during `Sliding`: playing from the start with sound.
    Featured,
    /// Active in the tail of `ScaleDown`: paused and muted.
    Dormant,
}

impl SlotRole {
    pub fn label(self) -> &'static str {
        match self {
            SlotRole::Parked => "parked",
            SlotRole::Ambient => "ambient",
            SlotRole::Featured => "featured",
            SlotRole::Dormant => "dormant",
        }
    }

    /// Desired role of clip `index`.
    pub fn desired(index: usize, active: usize, sample: &PhaseSample, tuning: &Tuning) -> Self {
        if index != active {
            return SlotRole::Parked;
        }
        match sample.phase {
            Phase::Sliding => SlotRole::Featured,
            Phase::ScaleDown if sample.local > tuning.late_pause_start => SlotRole::Dormant,
            Phase::ScaleUp | Phase::ScaleDown => SlotRole::Ambient,
        }
    }
}

#[derive(Debug)]
struct Slot<E> {
    element: E,
    /// `None` until the first reconciliation.
    role: Option<SlotRole>,
    preloaded: bool,
}

/// One media element per clip, keyed by index.
#[derive(Debug)]
pub struct VideoElementPool<E> {
    slots: Vec<Slot<E>>,
    /// Phase and active index of the previous reconciliation.
    last: Option<(Phase, usize)>,
}

impl<E: MediaElement> VideoElementPool<E> {
    pub fn new(elements: impl IntoIterator<Item = E>) -> Self {
        Self {
            slots: elements
                .into_iter()
                .map(|element| Slot {
                    element,
                    role: None,
                    preloaded: false,
                })
                .collect(),
            last: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn element(&self, index: usize) -> Option<&E> {
        self.slots.get(index).map(|s| &s.element)
    }

    #[cfg(test)]
    pub fn role(&self, index: usize) -> Option<SlotRole> {
        self.slots.get(index).and_then(|s| s.role)
    }

    #[cfg(test)]
    pub fn is_preloaded(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.preloaded)
    }

    /// Bring every element in line with the frame's phase and active index.
    pub fn reconcile(&mut self, sample: &PhaseSample, active: usize, tuning: &Tuning) {
        let entering_slide = sample.phase == Phase::Sliding
            && self.last != Some((Phase::Sliding, active));

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let desired = SlotRole::desired(index, active, sample, tuning);
            if slot.role != Some(desired) {
                debug!(
                    index,
                    from = slot.role.map_or("unset", SlotRole::label),
                    to = desired.label(),
                    "clip role change"
                );
                enter_role(&mut slot.element, index, desired, tuning);
                slot.role = Some(desired);
            } else {
                hold_role(&mut slot.element, index, desired);
            }
        }

        if entering_slide {
            self.preload_neighbours(active);
        }
        self.last = Some((sample.phase, active));
    }

    /// Start loading the clips either side of `active` so their first frame
    /// is ready before they slide in.
    pub fn preload_neighbours(&mut self, active: usize) {
        let neighbours = [active.checked_sub(1), active.checked_add(1)];
        for index in neighbours.into_iter().flatten() {
            if let Some(slot) = self.slots.get_mut(index) {
                if !slot.preloaded {
                    debug!(index, "preloading neighbour clip");
                    slot.element.load();
                    slot.preloaded = true;
                }
            }
        }
    }

    /// Mute every clip other than `active`.  Returns how many were audible.
    pub fn force_mute_except(&mut self, active: usize) -> usize {
        let mut muted = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if index != active && !slot.element.is_muted() {
                debug!(index, "force muting clip");
                slot.element.set_muted(true);
                muted += 1;
            }
        }
        muted
    }

    /// Mute, pause and rewind everything (teardown).
    pub fn park_all(&mut self) {
        for slot in &mut self.slots {
            slot.element.set_muted(true);
            slot.element.pause();
            slot.element.set_current_time(0.0);
            slot.role = Some(SlotRole::Parked);
        }
        self.last = None;
    }

    /// Advance every element's clock (simulated elements only).
    pub fn advance(&mut self, dt: f64) {
        for slot in &mut self.slots {
            slot.element.advance(dt);
        }
    }

    /// Active index for a sample, using this pool's size.
    pub fn active_for(&self, sample: &PhaseSample) -> usize {
        select_index(sample.phase, sample.local, self.slots.len())
    }
}

fn try_play<E: MediaElement>(element: &mut E, index: usize) {
    if let Err(err) = element.play() {
        debug!(index, %err, "clip play refused");
    }
}

fn enter_role<E: MediaElement>(element: &mut E, index: usize, role: SlotRole, tuning: &Tuning) {
    match role {
        SlotRole::Featured => {
            element.set_current_time(0.0);
            element.set_muted(false);
            element.set_volume(tuning.featured_volume);
            try_play(element, index);
        }
        SlotRole::Ambient => {
            element.set_muted(true);
            try_play(element, index);
        }
        SlotRole::Dormant => {
            element.set_muted(true);
            element.pause();
        }
        SlotRole::Parked => {
            element.set_muted(true);
            element.pause();
            element.set_current_time(0.0);
        }
    }
}

/// Per-frame upkeep for a clip whose role did not change.
fn hold_role<E: MediaElement>(element: &mut E, index: usize, role: SlotRole) {
    match role {
        SlotRole::Parked | SlotRole::Dormant => {
            if !element.is_muted() {
                element.set_muted(true);
            }
        }
        SlotRole::Ambient => {
            if !element.is_muted() {
                element.set_muted(true);
            }
            if element.is_paused() {
                try_play(element, index);
            }
        }
        SlotRole::Featured => {
            // A refused start (autoplay policy) is retried in place.
            if element.is_paused() {
                try_play(element, index);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::media::MediaError;

    /// Media fake that counts every call.
    #[derive(Debug, Default)]
    pub(crate) struct CountingMedia {
        pub muted: bool,
        pub paused: bool,
        pub time: f64,
        pub volume: f64,
        pub plays: u32,
        pub pauses: u32,
        pub loads: u32,
        pub rewinds: u32,
        pub refuse: bool,
    }

    impl CountingMedia {
        pub(crate) fn fresh() -> Self {
            Self {
                muted: true,
                paused: true,
                ..Self::default()
            }
        }
    }

    impl MediaElement for CountingMedia {
        fn play(&mut self) -> Result<(), MediaError> {
            self.plays += 1;
            if self.refuse {
                return Err(MediaError::AutoplayBlocked);
            }
            self.paused = false;
            Ok(())
        }
        fn pause(&mut self) {
            self.pauses += 1;
            self.paused = true;
        }
        fn load(&mut self) {
            self.loads += 1;
        }
        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
        fn is_muted(&self) -> bool {
            self.muted
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
        fn set_current_time(&mut self, seconds: f64) {
            if seconds == 0.0 {
                self.rewinds += 1;
            }
            self.time = seconds;
        }
        fn current_time(&self) -> f64 {
            self.time
        }
        fn set_volume(&mut self, volume: f64) {
            self.volume = volume;
        }
    }

    const T: Tuning = Tuning::DEFAULT;

    fn pool(n: usize) -> VideoElementPool<CountingMedia> {
        VideoElementPool::new((0..n).map(|_| CountingMedia::fresh()))
    }

    fn at(phase: Phase, local: f64) -> PhaseSample {
        PhaseSample {
            progress: 0.0,
            phase,
            local,
        }
    }

    #[test]
    fn featured_clip_plays_with_sound_from_start() {
        let mut p = pool(3);
        p.reconcile(&at(Phase::Sliding, 0.5), 1, &T);
        let el = p.element(1).unwrap();
        assert!(!el.muted);
        assert!(!el.paused);
        assert_eq!(el.time, 0.0);
        assert_eq!(el.volume, 0.5);
        assert_eq!(p.role(1), Some(SlotRole::Featured));
        assert!(p.element(0).unwrap().muted);
        assert!(p.element(2).unwrap().paused);
    }

    #[test]
    fn steady_frames_do_not_restart_or_thrash() {
        let mut p = pool(3);
        for _ in 0..10 {
            p.reconcile(&at(Phase::Sliding, 0.5), 1, &T);
        }
        let featured = p.element(1).unwrap();
        assert_eq!(featured.plays, 1);
        assert_eq!(featured.rewinds, 1);
        let parked = p.element(0).unwrap();
        assert_eq!(parked.pauses, 1);
        assert_eq!(parked.rewinds, 1);
    }

    #[test]
    fn active_clip_loops_silently_outside_sliding() {
        let mut p = pool(3);
        p.reconcile(&at(Phase::ScaleUp, 0.4), 0, &T);
        let el = p.element(0).unwrap();
        assert!(el.muted);
        assert!(!el.paused);
        assert_eq!(p.role(0), Some(SlotRole::Ambient));
    }

    #[test]
    fn late_scale_down_pauses_active_clip() {
        let mut p = pool(3);
        p.reconcile(&at(Phase::ScaleDown, 0.2), 2, &T);
        assert!(!p.element(2).unwrap().paused);
        p.reconcile(&at(Phase::ScaleDown, 0.6), 2, &T);
        let el = p.element(2).unwrap();
        assert!(el.paused);
        assert!(el.muted);
        assert_eq!(p.role(2), Some(SlotRole::Dormant));
    }

    #[test]
    fn leaving_active_parks_once() {
        let mut p = pool(3);
        p.reconcile(&at(Phase::Sliding, 0.1), 0, &T);
        p.reconcile(&at(Phase::Sliding, 0.4), 1, &T);
        p.reconcile(&at(Phase::Sliding, 0.45), 1, &T);
        let el = p.element(0).unwrap();
        assert!(el.muted);
        assert!(el.paused);
        // Rewound once when featured and once when parked.
        assert_eq!(el.pauses, 1);
        assert_eq!(el.rewinds, 2);
    }

    #[test]
    fn entering_sliding_preloads_neighbours() {
        let mut p = pool(5);
        p.reconcile(&at(Phase::ScaleUp, 1.0), 0, &T);
        assert_eq!(p.element(1).unwrap().loads, 0);

        p.reconcile(&at(Phase::Sliding, 0.0), 0, &T);
        assert_eq!(p.element(1).unwrap().loads, 1);
        assert!(p.is_preloaded(1));

        p.reconcile(&at(Phase::Sliding, 0.5), 2, &T);
        assert_eq!(p.element(1).unwrap().loads, 1);
        assert_eq!(p.element(3).unwrap().loads, 1);
        assert_eq!(p.element(4).unwrap().loads, 0);
    }

    #[test]
    fn refused_play_is_ignored_and_retried() {
        let mut p = pool(2);
        p.slots[0].element.refuse = true;
        p.reconcile(&at(Phase::Sliding, 0.0), 0, &T);
        assert!(p.element(0).unwrap().paused);
        p.slots[0].element.refuse = false;
        p.reconcile(&at(Phase::Sliding, 0.1), 0, &T);
        let el = p.element(0).unwrap();
        assert!(!el.paused);
        assert_eq!(el.rewinds, 1);
    }

    #[test]
    fn force_mute_spares_active() {
        let mut p = pool(3);
        for slot in &mut p.slots {
            slot.element.muted = false;
        }
        assert_eq!(p.force_mute_except(1), 2);
        assert!(p.element(0).unwrap().muted);
        assert!(!p.element(1).unwrap().muted);
    }

    #[test]
    fn park_all_silences_everything() {
        let mut p = pool(3);
        p.reconcile(&at(Phase::Sliding, 0.5), 1, &T);
        p.park_all();
        for i in 0..3 {
            let el = p.element(i).unwrap();
            assert!(el.muted && el.paused);
            assert_eq!(p.role(i), Some(SlotRole::Parked));
        }
    }
}
