use crate::DialUnit;
use crate::format::{self, Hms};
use crate::geometry::{DialGeometry, GeometryError, Point};
use crate::schedule::{Scheduler, TaskKey, TaskSet, Ticket};
use crate::selector::{AngularSelector, AnimationStatus, DialFrame, SelectorError};
use std::time::Duration;
use strum::Display;
use thiserror::Error;

pub const MINUTE_STEPS: usize = 60;
pub const SECOND_STEPS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TimerState {
    Set,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// 12 or 24 positions on the hours dial.
    pub hour_steps: usize,
    pub dial_size: f64,
    pub ring_thickness: f64,
    pub scroll_threshold: f64,
    pub tick_period: Duration,
    pub frame_period: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            hour_steps: 12,
            dial_size: 90.0,
            ring_thickness: 32.0,
            scroll_threshold: crate::selector::DEFAULT_SCROLL_THRESHOLD,
            tick_period: Duration::from_secs(1),
            frame_period: Duration::from_millis(16),
        }
    }
}

impl ControllerConfig {
    pub fn steps_for(&self, unit: DialUnit) -> usize {
        match unit {
            DialUnit::Hours => self.hour_steps,
            DialUnit::Minutes => MINUTE_STEPS,
            DialUnit::Seconds => SECOND_STEPS,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ControllerError {
    #[error("{unit} dial: {source}")]
    Dial {
        unit: DialUnit,
        #[source]
        source: SelectorError,
    },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("{unit} value {value} is outside 0..{steps}")]
    OutOfRange {
        unit: DialUnit,
        value: usize,
        steps: usize,
    },
    #[error("the duration can only be edited while the timer is set, not {0}")]
    NotEditable(TimerState),
}

/// Outcome of feeding one input event to a dial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialAction {
    pub should_redraw: bool,
    pub committed: Option<usize>,
}

impl DialAction {
    pub fn new(should_redraw: bool, committed: Option<usize>) -> Self {
        Self {
            should_redraw,
            committed,
        }
    }

    fn ignored() -> Self {
        Self::default()
    }
}

/// Countdown state machine driving three dials. Owns the one-second
/// countdown task and each dial's animation task.
#[derive(Debug)]
pub struct CountdownController<S: Scheduler> {
    state: TimerState,
    fields: Hms,
    time_left: u64,
    focused: bool,
    drag_owner: Option<DialUnit>,
    dials: [AngularSelector; 3],
    config: ControllerConfig,
    tasks: TaskSet<S>,
}

impl<S: Scheduler> CountdownController<S> {
    pub fn new(config: ControllerConfig, scheduler: S) -> Result<Self, ControllerError> {
        let fields = Hms::default();
        let dials = Self::build_dials(&config, fields)?;
        Ok(Self {
            state: TimerState::Set,
            fields,
            time_left: 0,
            focused: false,
            drag_owner: None,
            dials,
            config,
            tasks: TaskSet::new(scheduler),
        })
    }

    fn build_dials(
        config: &ControllerConfig,
        values: Hms,
    ) -> Result<[AngularSelector; 3], ControllerError> {
        let geometry = DialGeometry::from_size(config.dial_size, config.ring_thickness)?;
        let build = |unit: DialUnit| {
            AngularSelector::new(config.steps_for(unit), values.field(unit), geometry)
                .and_then(|s| s.with_scroll_threshold(config.scroll_threshold))
                .map_err(|source| ControllerError::Dial { unit, source })
        };
        Ok([
            build(DialUnit::Hours)?,
            build(DialUnit::Minutes)?,
            build(DialUnit::Seconds)?,
        ])
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration(&self) -> Hms {
        self.fields
    }

    pub fn field(&self, unit: DialUnit) -> usize {
        self.fields.field(unit)
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn dial(&self, unit: DialUnit) -> &AngularSelector {
        &self.dials[unit.as_index()]
    }

    pub fn frame(&self, unit: DialUnit) -> DialFrame {
        self.dial(unit).frame()
    }

    pub fn drag_owner(&self) -> Option<DialUnit> {
        self.drag_owner
    }

    pub fn scheduler(&self) -> &S {
        self.tasks.scheduler()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn countdown_label(&self) -> String {
        format::format_countdown(self.time_left)
    }

    /// Share of the started duration still remaining, 1.0 while set.
    pub fn remaining_fraction(&self) -> f64 {
        let total = self.fields.total_seconds();
        match self.state {
            TimerState::Set => 1.0,
            _ if total == 0 => 0.0,
            _ => self.time_left as f64 / total as f64,
        }
    }

    pub fn can_play(&self) -> bool {
        match self.state {
            TimerState::Set => !self.fields.is_zero(),
            TimerState::Paused => true,
            TimerState::Running | TimerState::Completed => false,
        }
    }

    pub fn set_field(&mut self, unit: DialUnit, value: usize) -> Result<(), ControllerError> {
        self.check_editable()?;
        let steps = self.config.steps_for(unit);
        if value >= steps {
            return Err(ControllerError::OutOfRange { unit, value, steps });
        }
        self.commit(unit, value);
        Ok(())
    }

    pub fn set_duration(&mut self, duration: Hms) -> Result<(), ControllerError> {
        self.check_editable()?;
        for unit in [DialUnit::Hours, DialUnit::Minutes, DialUnit::Seconds] {
            let (value, steps) = (duration.field(unit), self.config.steps_for(unit));
            if value >= steps {
                return Err(ControllerError::OutOfRange { unit, value, steps });
            }
        }
        for unit in [DialUnit::Hours, DialUnit::Minutes, DialUnit::Seconds] {
            self.commit(unit, duration.field(unit));
        }
        Ok(())
    }

    fn check_editable(&self) -> Result<(), ControllerError> {
        match self.state {
            TimerState::Set => Ok(()),
            other => Err(ControllerError::NotEditable(other)),
        }
    }

    fn commit(&mut self, unit: DialUnit, value: usize) -> bool {
        let field = self.fields.field_mut(unit);
        let changed = *field != value;
        *field = value;

        if self.dials[unit.as_index()].set_value(value) {
            self.tasks.ensure(TaskKey::Animation(unit), self.config.frame_period);
        }
        self.recompute_time_left();

        if changed {
            log::debug!("{} set to {}", unit, value);
        }
        changed
    }

    fn recompute_time_left(&mut self) {
        self.time_left = self.fields.total_seconds();
    }

    fn clamped(mut fields: Hms, config: &ControllerConfig) -> Hms {
        fields.hours = fields.hours.min(config.hour_steps.saturating_sub(1));
        fields
    }

    /// Pulls the fields into the current dial ranges and recomputes the time
    /// left. The dials were already built from the clamped values.
    fn clamp_fields(&mut self) {
        let clamped = Self::clamped(self.fields, &self.config);
        if clamped != self.fields {
            log::debug!("hours clamped from {} to {}", self.fields.hours, clamped.hours);
            self.fields = clamped;
        }
        self.recompute_time_left();
    }

    /// Another dial owns the pointer for the rest of its gesture.
    fn is_captured_elsewhere(&self, unit: DialUnit) -> bool {
        self.drag_owner.is_some_and(|owner| owner != unit)
    }

    pub fn pointer_down(&mut self, unit: DialUnit, p: Point) -> DialAction {
        if self.state != TimerState::Set || self.is_captured_elsewhere(unit) {
            return DialAction::ignored();
        }
        match self.dials[unit.as_index()].pointer_down(p) {
            Some(step) => {
                self.drag_owner = Some(unit);
                self.commit(unit, step);
                DialAction::new(true, Some(step))
            }
            None => DialAction::ignored(),
        }
    }

    pub fn pointer_move(&mut self, unit: DialUnit, p: Point) -> DialAction {
        if self.state != TimerState::Set || self.is_captured_elsewhere(unit) {
            return DialAction::ignored();
        }
        let dial = &mut self.dials[unit.as_index()];
        let hover_before = dial.hover_step();
        let step = dial.pointer_move(p);
        let hover_changed = hover_before != dial.hover_step();

        match step {
            Some(step) => {
                let changed = self.commit(unit, step);
                DialAction::new(changed || hover_changed, Some(step))
            }
            None => DialAction::new(hover_changed, None),
        }
    }

    pub fn pointer_up(&mut self, unit: DialUnit) -> DialAction {
        let dial = &mut self.dials[unit.as_index()];
        let was_dragging = dial.is_dragging();
        dial.pointer_up();
        if self.drag_owner == Some(unit) {
            self.drag_owner = None;
        }
        DialAction::new(was_dragging, None)
    }

    pub fn pointer_leave(&mut self, unit: DialUnit) -> DialAction {
        let dial = &mut self.dials[unit.as_index()];
        let hover_before = dial.hover_step();
        dial.pointer_leave();
        DialAction::new(hover_before != dial.hover_step(), None)
    }

    /// Wheel input, positive = up. Only accepted while the timer is set.
    pub fn scroll(&mut self, unit: DialUnit, delta: f64) -> DialAction {
        if self.state != TimerState::Set {
            return DialAction::ignored();
        }
        match self.dials[unit.as_index()].scroll(delta) {
            Some(value) => {
                let changed = self.commit(unit, value);
                DialAction::new(changed, Some(value))
            }
            None => DialAction::ignored(),
        }
    }

    fn release_pointer(&mut self) {
        for dial in &mut self.dials {
            dial.pointer_up();
            dial.pointer_leave();
        }
        self.drag_owner = None;
    }

    pub fn play(&mut self) -> bool {
        if !self.can_play() {
            return self.reject("play");
        }
        self.enter(TimerState::Running)
    }

    pub fn resume(&mut self) -> bool {
        match self.state {
            TimerState::Paused => self.enter(TimerState::Running),
            _ => self.reject("resume"),
        }
    }

    pub fn pause(&mut self) -> bool {
        match self.state {
            TimerState::Running => self.enter(TimerState::Paused),
            _ => self.reject("pause"),
        }
    }

    pub fn stop(&mut self) -> bool {
        match self.state {
            TimerState::Running => self.enter(TimerState::Set),
            _ => self.reject("stop"),
        }
    }

    pub fn reset(&mut self) -> bool {
        match self.state {
            TimerState::Paused | TimerState::Completed => self.enter(TimerState::Set),
            _ => self.reject("reset"),
        }
    }

    fn reject(&self, command: &str) -> bool {
        log::debug!("ignoring {} while {}", command, self.state);
        false
    }

    fn enter(&mut self, next: TimerState) -> bool {
        let prev = std::mem::replace(&mut self.state, next);

        if prev == TimerState::Running {
            self.tasks.stop(TaskKey::Countdown);
        }
        if prev == TimerState::Set {
            self.release_pointer();
        }

        match next {
            TimerState::Running => {
                self.tasks.start(TaskKey::Countdown, self.config.tick_period);
            }
            TimerState::Set => self.clamp_fields(),
            TimerState::Paused | TimerState::Completed => {}
        }

        log::debug!("timer {} -> {}", prev, next);
        true
    }

    /// Delivers a firing from the scheduler. Returns `true` when the view
    /// needs redrawing.
    pub fn on_task(&mut self, ticket: Ticket) -> bool {
        if !self.tasks.is_live(ticket) {
            log::debug!("dropping stale {}", ticket);
            return false;
        }
        match ticket.key {
            TaskKey::Countdown => self.tick(),
            TaskKey::Animation(unit) => self.animate(unit),
        }
    }

    fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        if self.time_left <= 1 {
            self.time_left = 0;
            self.enter(TimerState::Completed);
            log::info!("countdown of {} completed", self.fields);
        } else {
            self.time_left -= 1;
        }
        true
    }

    fn animate(&mut self, unit: DialUnit) -> bool {
        if self.dials[unit.as_index()].tick_animation() == AnimationStatus::Settled {
            self.tasks.stop(TaskKey::Animation(unit));
        }
        true
    }

    /// Applies new dial settings. Animations are cancelled and every dial
    /// snaps to its value. Hours beyond the new dial's range are clamped, but
    /// only once the timer is back in `Set`; a running duration is untouched.
    pub fn reconfigure(&mut self, config: ControllerConfig) -> Result<(), ControllerError> {
        let dials = Self::build_dials(&config, Self::clamped(self.fields, &config))?;

        self.tasks.stop_where(|key| matches!(key, TaskKey::Animation(_)));
        self.drag_owner = None;
        self.dials = dials;

        let tick_changed = config.tick_period != self.config.tick_period;
        self.config = config;

        match self.state {
            TimerState::Set => self.clamp_fields(),
            TimerState::Running if tick_changed => {
                self.tasks.start(TaskKey::Countdown, self.config.tick_period);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Controller = CountdownController<ManualScheduler>;

    fn controller() -> Controller {
        CountdownController::new(ControllerConfig::default(), ManualScheduler::new()).unwrap()
    }

    fn ring_point(ctrl: &Controller, unit: DialUnit, angle: f64) -> Point {
        ctrl.dial(unit).geometry().indicator(angle)
    }

    fn fire(ctrl: &mut Controller, key: TaskKey) -> bool {
        let ticket = ctrl.scheduler().ticket(key).expect("task should be active");
        ctrl.on_task(ticket)
    }

    fn settle(ctrl: &mut Controller, unit: DialUnit) -> usize {
        let key = TaskKey::Animation(unit);
        let mut frames = 0;
        while ctrl.scheduler().is_active(key) {
            fire(ctrl, key);
            frames += 1;
            assert!(frames <= 30);
        }
        frames
    }

    #[test]
    fn test_five_second_countdown() {
        let mut ctrl = controller();
        ctrl.set_duration(Hms::new(0, 0, 5)).unwrap();
        assert!(ctrl.play());
        assert_eq!(ctrl.state(), TimerState::Running);
        assert_eq!(ctrl.time_left(), 5);
        assert_eq!(
            ctrl.scheduler().period(TaskKey::Countdown),
            Some(Duration::from_secs(1))
        );

        for remaining in (0..5).rev() {
            assert!(fire(&mut ctrl, TaskKey::Countdown));
            assert_eq!(ctrl.time_left(), remaining);
        }
        assert_eq!(ctrl.state(), TimerState::Completed);
        assert!(!ctrl.scheduler().is_active(TaskKey::Countdown));

        assert!(ctrl.reset());
        assert_eq!(ctrl.state(), TimerState::Set);
        assert_eq!(ctrl.duration(), Hms::new(0, 0, 5));
        assert_eq!(ctrl.time_left(), 5);
    }

    #[test]
    fn test_play_rejected_at_zero() {
        let mut ctrl = controller();
        assert!(!ctrl.can_play());
        assert!(!ctrl.play());
        assert_eq!(ctrl.state(), TimerState::Set);
        assert!(!ctrl.scheduler().is_active(TaskKey::Countdown));
    }

    #[test]
    fn test_pause_resume_preserves_time_left() {
        let mut ctrl = controller();
        ctrl.set_duration(Hms::new(0, 1, 0)).unwrap();
        ctrl.play();
        fire(&mut ctrl, TaskKey::Countdown);
        fire(&mut ctrl, TaskKey::Countdown);
        let queued = ctrl.scheduler().ticket(TaskKey::Countdown).unwrap();

        assert!(ctrl.pause());
        assert_eq!(ctrl.time_left(), 58);
        assert!(!ctrl.scheduler().is_active(TaskKey::Countdown));
        // a firing already in flight when the pause happened
        assert!(!ctrl.on_task(queued));
        assert_eq!(ctrl.time_left(), 58);

        assert!(ctrl.resume());
        assert_eq!(ctrl.state(), TimerState::Running);
        assert_eq!(ctrl.time_left(), 58);
        let fresh = ctrl.scheduler().ticket(TaskKey::Countdown).unwrap();
        assert_ne!(fresh, queued);
        assert!(!ctrl.on_task(queued));
        assert_eq!(ctrl.time_left(), 58);
    }

    #[test]
    fn test_play_resumes_from_pause() {
        let mut ctrl = controller();
        ctrl.set_duration(Hms::new(0, 0, 10)).unwrap();
        ctrl.play();
        ctrl.pause();
        assert!(ctrl.can_play());
        assert!(ctrl.play());
        assert_eq!(ctrl.state(), TimerState::Running);
    }

    #[test]
    fn test_stop_keeps_fields() {
        let mut ctrl = controller();
        ctrl.set_duration(Hms::new(1, 2, 3)).unwrap();
        ctrl.play();
        fire(&mut ctrl, TaskKey::Countdown);
        assert_eq!(ctrl.time_left(), 3722);
        assert!(ctrl.stop());
        assert_eq!(ctrl.state(), TimerState::Set);
        assert_eq!(ctrl.duration(), Hms::new(1, 2, 3));
        assert_eq!(ctrl.time_left(), 3723);
        assert!(!ctrl.scheduler().is_active(TaskKey::Countdown));
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let mut ctrl = controller();
        assert!(!ctrl.pause());
        assert!(!ctrl.stop());
        assert!(!ctrl.reset());
        assert!(!ctrl.resume());

        ctrl.set_duration(Hms::new(0, 0, 1)).unwrap();
        ctrl.play();
        assert!(!ctrl.reset());
        assert!(!ctrl.play());
        fire(&mut ctrl, TaskKey::Countdown);
        assert_eq!(ctrl.state(), TimerState::Completed);
        assert!(!ctrl.play());
        assert!(!ctrl.stop());
        assert!(!ctrl.pause());
    }

    #[test]
    fn test_reset_from_pause_recomputes() {
        let mut ctrl = controller();
        ctrl.set_duration(Hms::new(0, 0, 30)).unwrap();
        ctrl.play();
        fire(&mut ctrl, TaskKey::Countdown);
        ctrl.pause();
        assert!(ctrl.reset());
        assert_eq!(ctrl.time_left(), 30);
    }

    #[test]
    fn test_editing_locked_outside_set() {
        let mut ctrl = controller();
        ctrl.set_duration(Hms::new(0, 5, 0)).unwrap();
        ctrl.play();

        assert_eq!(
            ctrl.set_field(DialUnit::Minutes, 10),
            Err(ControllerError::NotEditable(TimerState::Running))
        );
        let p = ring_point(&ctrl, DialUnit::Minutes, 90.0);
        assert_eq!(ctrl.pointer_down(DialUnit::Minutes, p), DialAction::default());
        assert_eq!(ctrl.scroll(DialUnit::Minutes, 5.0), DialAction::default());
        assert_eq!(ctrl.duration(), Hms::new(0, 5, 0));
        assert_eq!(ctrl.time_left(), 300);
    }

    #[test]
    fn test_set_field_range() {
        let mut ctrl = controller();
        assert_eq!(
            ctrl.set_field(DialUnit::Hours, 12),
            Err(ControllerError::OutOfRange {
                unit: DialUnit::Hours,
                value: 12,
                steps: 12
            })
        );
        assert!(ctrl.set_duration(Hms::new(0, 60, 0)).is_err());
        assert_eq!(ctrl.duration(), Hms::default());
        ctrl.set_field(DialUnit::Hours, 11).unwrap();
        assert_eq!(ctrl.time_left(), 11 * 3600);
    }

    #[test]
    fn test_pointer_commit_updates_time_left() {
        let mut ctrl = controller();
        let p = ring_point(&ctrl, DialUnit::Minutes, 90.0);
        let action = ctrl.pointer_down(DialUnit::Minutes, p);
        assert_eq!(action, DialAction::new(true, Some(15)));
        assert_eq!(ctrl.field(DialUnit::Minutes), 15);
        assert_eq!(ctrl.time_left(), 900);
        assert_eq!(ctrl.drag_owner(), Some(DialUnit::Minutes));

        let p = ring_point(&ctrl, DialUnit::Minutes, 180.0);
        let action = ctrl.pointer_move(DialUnit::Minutes, p);
        assert_eq!(action.committed, Some(30));
        assert_eq!(ctrl.time_left(), 1800);

        ctrl.pointer_up(DialUnit::Minutes);
        assert_eq!(ctrl.drag_owner(), None);
        assert_eq!(ctrl.field(DialUnit::Minutes), 30);
    }

    #[test]
    fn test_animation_task_lifecycle() {
        let mut ctrl = controller();
        ctrl.set_field(DialUnit::Seconds, 45).unwrap();
        let key = TaskKey::Animation(DialUnit::Seconds);
        assert!(ctrl.scheduler().is_active(key));
        assert_eq!(ctrl.scheduler().period(key), Some(Duration::from_millis(16)));
        assert!(settle(&mut ctrl, DialUnit::Seconds) > 1);
        assert_eq!(ctrl.frame(DialUnit::Seconds).animated_angle, 270.0);
        assert!(!ctrl.scheduler().is_active(key));

        // unchanged value leaves nothing to animate
        ctrl.set_field(DialUnit::Seconds, 45).unwrap();
        assert!(!ctrl.scheduler().is_active(key));
    }

    #[test]
    fn test_drag_off_ring_keeps_last_commit() {
        let mut ctrl = controller();
        let p = ring_point(&ctrl, DialUnit::Minutes, 0.0);
        ctrl.pointer_down(DialUnit::Minutes, p);

        let outside = ctrl.dial(DialUnit::Minutes).geometry().center;
        let far_right = Point::new(outside.x + 300.0, outside.y);
        assert_eq!(ctrl.pointer_move(DialUnit::Minutes, far_right).committed, None);
        assert_eq!(ctrl.field(DialUnit::Minutes), 0);
        assert_eq!(ctrl.drag_owner(), Some(DialUnit::Minutes));

        let back = ring_point(&ctrl, DialUnit::Minutes, 90.0);
        assert_eq!(ctrl.pointer_move(DialUnit::Minutes, back).committed, Some(15));
        assert_eq!(ctrl.time_left(), 900);
    }

    #[test]
    fn test_other_dial_ignored_during_drag() {
        let mut ctrl = controller();
        let p = ring_point(&ctrl, DialUnit::Hours, 90.0);
        ctrl.pointer_down(DialUnit::Hours, p);
        assert_eq!(ctrl.field(DialUnit::Hours), 3);

        let q = ring_point(&ctrl, DialUnit::Minutes, 90.0);
        assert_eq!(ctrl.pointer_down(DialUnit::Minutes, q), DialAction::default());
        assert_eq!(ctrl.pointer_move(DialUnit::Minutes, q), DialAction::default());
        assert_eq!(ctrl.field(DialUnit::Minutes), 0);

        ctrl.pointer_up(DialUnit::Hours);
        assert_eq!(ctrl.pointer_down(DialUnit::Minutes, q).committed, Some(15));
    }

    #[test]
    fn test_hover_reports_redraw_only_on_change() {
        let mut ctrl = controller();
        let p = ring_point(&ctrl, DialUnit::Minutes, 90.0);
        assert_eq!(ctrl.pointer_move(DialUnit::Minutes, p), DialAction::new(true, None));
        assert_eq!(ctrl.pointer_move(DialUnit::Minutes, p), DialAction::new(false, None));
        assert_eq!(ctrl.frame(DialUnit::Minutes).hover_step, Some(15));
        assert_eq!(ctrl.pointer_leave(DialUnit::Minutes), DialAction::new(true, None));
        assert_eq!(ctrl.field(DialUnit::Minutes), 0);
    }

    #[test]
    fn test_scroll_steps_and_wraps() {
        let mut ctrl = controller();
        ctrl.scroll(DialUnit::Seconds, 0.5);
        ctrl.scroll(DialUnit::Seconds, 0.5);
        ctrl.scroll(DialUnit::Seconds, 1.0);
        assert_eq!(ctrl.field(DialUnit::Seconds), 2);
        assert_eq!(ctrl.time_left(), 2);

        for _ in 0..3 {
            ctrl.scroll(DialUnit::Seconds, -1.0);
        }
        assert_eq!(ctrl.field(DialUnit::Seconds), 59);
        assert_eq!(ctrl.time_left(), 59);
    }

    #[test]
    fn test_play_releases_drag() {
        let mut ctrl = controller();
        let p = ring_point(&ctrl, DialUnit::Seconds, 90.0);
        ctrl.pointer_down(DialUnit::Seconds, p);
        ctrl.play();
        assert_eq!(ctrl.drag_owner(), None);
        assert!(!ctrl.dial(DialUnit::Seconds).is_dragging());
    }

    #[test]
    fn test_stray_countdown_tick_ignored() {
        let mut ctrl = controller();
        let bogus = Ticket {
            key: TaskKey::Countdown,
            generation: 42,
        };
        assert!(!ctrl.on_task(bogus));
        assert_eq!(ctrl.state(), TimerState::Set);
    }

    #[test]
    fn test_reconfigure_clamps_hours() {
        let config = ControllerConfig {
            hour_steps: 24,
            ..ControllerConfig::default()
        };
        let mut ctrl = CountdownController::new(config, ManualScheduler::new()).unwrap();
        ctrl.set_duration(Hms::new(20, 0, 0)).unwrap();
        assert!(ctrl.scheduler().is_active(TaskKey::Animation(DialUnit::Hours)));

        ctrl.reconfigure(ControllerConfig::default()).unwrap();
        assert_eq!(ctrl.field(DialUnit::Hours), 11);
        assert_eq!(ctrl.time_left(), 11 * 3600);
        assert_eq!(ctrl.dial(DialUnit::Hours).steps(), 12);
        assert!(ctrl.dial(DialUnit::Hours).is_settled());
        assert_eq!(ctrl.scheduler().active_count(), 0);
    }

    #[test]
    fn test_reconfigure_while_running_keeps_duration() {
        let config = ControllerConfig {
            hour_steps: 24,
            ..ControllerConfig::default()
        };
        let mut ctrl = CountdownController::new(config, ManualScheduler::new()).unwrap();
        ctrl.set_duration(Hms::new(20, 0, 0)).unwrap();
        assert!(ctrl.play());
        fire(&mut ctrl, TaskKey::Countdown);

        ctrl.reconfigure(ControllerConfig::default()).unwrap();
        assert_eq!(ctrl.state(), TimerState::Running);
        assert_eq!(ctrl.duration(), Hms::new(20, 0, 0));
        assert_eq!(ctrl.time_left(), 20 * 3600 - 1);
        assert!(ctrl.remaining_fraction() <= 1.0);
        assert_eq!(ctrl.dial(DialUnit::Hours).value(), 11);
        assert!(ctrl.scheduler().is_active(TaskKey::Countdown));

        // the shorter dial applies once the timer is set again
        assert!(ctrl.stop());
        assert_eq!(ctrl.field(DialUnit::Hours), 11);
        assert_eq!(ctrl.time_left(), 11 * 3600);
    }

    #[test]
    fn test_reconfigure_rejects_bad_size() {
        let mut ctrl = controller();
        ctrl.set_field(DialUnit::Minutes, 3).unwrap();
        let bad = ControllerConfig {
            dial_size: 0.0,
            ..ControllerConfig::default()
        };
        assert_eq!(
            ctrl.reconfigure(bad),
            Err(ControllerError::Geometry(GeometryError::InvalidSize(0.0)))
        );
        assert_eq!(ctrl.config(), &ControllerConfig::default());
        assert_eq!(ctrl.field(DialUnit::Minutes), 3);
    }

    #[test]
    fn test_zero_hour_steps_rejected() {
        let config = ControllerConfig {
            hour_steps: 0,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            CountdownController::new(config, ManualScheduler::new()),
            Err(ControllerError::Dial {
                unit: DialUnit::Hours,
                source: SelectorError::ZeroSteps
            })
        ));
    }

    #[test]
    fn test_drop_cancels_tasks() {
        let shared = Rc::new(RefCell::new(ManualScheduler::new()));
        {
            let mut ctrl =
                CountdownController::new(ControllerConfig::default(), shared.clone()).unwrap();
            ctrl.set_duration(Hms::new(0, 10, 0)).unwrap();
            ctrl.play();
            assert!(shared.borrow().active_count() >= 1);
        }
        assert_eq!(shared.borrow().active_count(), 0);
    }

    #[test]
    fn test_remaining_fraction() {
        let mut ctrl = controller();
        ctrl.set_duration(Hms::new(0, 0, 4)).unwrap();
        assert_eq!(ctrl.remaining_fraction(), 1.0);
        ctrl.play();
        fire(&mut ctrl, TaskKey::Countdown);
        assert_eq!(ctrl.remaining_fraction(), 0.75);
        assert_eq!(ctrl.countdown_label(), "00:03");
    }
}
