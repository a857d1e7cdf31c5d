//! Click-twice-to-delete gesture.
//!
//! The first [`ConfirmDelete::confirm`] for an id arms it; a second one for
//! the same id before the deadline runs the delete action. Anything else
//! (another id, [`ConfirmDelete::cancel`], the deadline passing) drops the
//! armed state without deleting.
//!
//! # Invariants
//!
//! 1. **One armed id**: at most one id is armed, so at most one deadline is
//!    pending per helper.
//! 2. **Action runs only on confirmation**: the delete action is invoked
//!    only by a second `confirm` with the armed id before its deadline.
//! 3. **Expiry resets the gesture**: once the deadline passes, the next
//!    `confirm` arms again instead of deleting. Queries observe expiry
//!    without needing [`ConfirmDelete::tick`].
//! 4. **Failures keep the arm**: if the action fails, its error is returned
//!    and the id stays armed with a fresh deadline.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Delete action fails | Backend error in caller's action | Error returned, id stays armed |
//! | Clock goes backwards | Manual clocks in tests | Deadline simply not reached |

use std::cell::Cell;
use std::fmt;

use mlo_i18n::Translator;
use tracing::debug;
use web_time::{Duration, Instant};

/// Default time a gesture stays armed.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_millis(3500);

/// Default CSS class of a delete button.
pub const BASE_CLASS: &str = "delete-btn";

/// Class added while the button's id is armed.
pub const ARMED_CLASS: &str = "confirm-delete";

/// Icon shown while armed.
pub const ICON_ARMED: &str = "❓";

/// Icon shown while idle.
pub const ICON_IDLE: &str = "🗑️";

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of monotonic time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The process's monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Where the gesture stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteGesture<T> {
    Idle,
    Armed { id: T, deadline: Instant },
}

/// What a `confirm` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The id is now armed; nothing was deleted.
    Armed,
    /// The delete action ran and succeeded.
    Deleted,
}

type DeleteAction<T, E> = Box<dyn FnMut(&T) -> Result<(), E>>;

/// Two-phase delete gesture over ids of type `T`.
pub struct ConfirmDelete<T, E, C = SystemClock> {
    state: DeleteGesture<T>,
    action: DeleteAction<T, E>,
    timeout: Duration,
    clock: C,
}

impl<T: fmt::Debug, E, C> fmt::Debug for ConfirmDelete<T, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmDelete")
            .field("state", &self.state)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<T: PartialEq + Clone + fmt::Debug, E> ConfirmDelete<T, E, SystemClock> {
    /// Helper with the default timeout and the system clock.
    pub fn new(action: impl FnMut(&T) -> Result<(), E> + 'static) -> Self {
        Self::with_clock(action, DEFAULT_CONFIRM_TIMEOUT, SystemClock)
    }
}

impl<T: PartialEq + Clone + fmt::Debug, E, C: Clock> ConfirmDelete<T, E, C> {
    pub fn with_clock(
        action: impl FnMut(&T) -> Result<(), E> + 'static,
        timeout: Duration,
        clock: C,
    ) -> Self {
        Self {
            state: DeleteGesture::Idle,
            action: Box::new(action),
            timeout,
            clock,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Arm `id`, or delete it if it is already armed.
    pub fn confirm(&mut self, id: T) -> Result<ConfirmOutcome, E> {
        let now = self.clock.now();
        if self.armed_at(now) == Some(&id) {
            match (self.action)(&id) {
                Ok(()) => {
                    debug!(target: "mlo.app", id = ?id, "delete confirmed");
                    self.state = DeleteGesture::Idle;
                    Ok(ConfirmOutcome::Deleted)
                }
                Err(err) => {
                    debug!(target: "mlo.app", id = ?id, "delete failed, staying armed");
                    self.state = DeleteGesture::Armed {
                        id,
                        deadline: now + self.timeout,
                    };
                    Err(err)
                }
            }
        } else {
            debug!(target: "mlo.app", id = ?id, "delete armed");
            self.state = DeleteGesture::Armed {
                id,
                deadline: now + self.timeout,
            };
            Ok(ConfirmOutcome::Armed)
        }
    }

    /// Drop any armed id without deleting.
    pub fn cancel(&mut self) {
        self.state = DeleteGesture::Idle;
    }

    /// Drop the armed id if its deadline has passed. Returns whether it did.
    pub fn tick(&mut self) -> bool {
        let expired = matches!(self.state, DeleteGesture::Armed { .. })
            && self.armed_at(self.clock.now()).is_none();
        if expired {
            debug!(target: "mlo.app", "delete confirmation expired");
            self.state = DeleteGesture::Idle;
        }
        expired
    }

    /// The armed id, if its deadline has not passed.
    #[must_use]
    pub fn pending_id(&self) -> Option<&T> {
        self.armed_at(self.clock.now())
    }

    /// Current gesture state, including an armed id whose deadline passed
    /// but has not been ticked away yet.
    #[must_use]
    pub fn state(&self) -> &DeleteGesture<T> {
        &self.state
    }

    #[must_use]
    pub fn is_pending_delete(&self, id: &T) -> bool {
        self.pending_id() == Some(id)
    }

    #[must_use]
    pub fn delete_icon(&self, id: &T) -> &'static str {
        if self.is_pending_delete(id) {
            ICON_ARMED
        } else {
            ICON_IDLE
        }
    }

    /// Classes for the delete button of `id`. `None` uses [`BASE_CLASS`].
    #[must_use]
    pub fn button_class(&self, id: &T, base: Option<&str>) -> ButtonClass {
        ButtonClass {
            base: base.unwrap_or(BASE_CLASS).to_string(),
            armed: self.is_pending_delete(id),
        }
    }

    /// Tooltip for the delete button of `id`.
    #[must_use]
    pub fn button_title(
        &self,
        id: &T,
        translator: &dyn Translator,
        confirm_key: &str,
        normal_key: &str,
    ) -> String {
        let key = if self.is_pending_delete(id) {
            confirm_key
        } else {
            normal_key
        };
        translator.t(key, &[])
    }

    fn armed_at(&self, now: Instant) -> Option<&T> {
        match &self.state {
            DeleteGesture::Armed { id, deadline } if now < *deadline => Some(id),
            _ => None,
        }
    }
}

/// Delete-button classes: a base class plus [`ARMED_CLASS`] when armed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonClass {
    pub base: String,
    pub armed: bool,
}

impl ButtonClass {
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        let mut classes = vec![self.base.as_str()];
        if self.armed {
            classes.push(ARMED_CLASS);
        }
        classes
    }
}

impl fmt::Display for ButtonClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.classes().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlo_i18n::{KeyEcho, MessageBundle, SupportedLocale, TranslationEngine};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn helper(clock: Rc<ManualClock>) -> (ConfirmDelete<String, String, Rc<ManualClock>>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let cd = ConfirmDelete::with_clock(
            move |id: &String| {
                sink.borrow_mut().push(id.clone());
                Ok(())
            },
            DEFAULT_CONFIRM_TIMEOUT,
            clock,
        );
        (cd, log)
    }

    #[test]
    fn first_click_arms_without_deleting() {
        let clock = Rc::new(ManualClock::new());
        let (mut cd, log) = helper(clock);
        assert_eq!(cd.confirm("x".into()), Ok(ConfirmOutcome::Armed));
        assert!(cd.is_pending_delete(&"x".into()));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn second_click_deletes_once_and_clears() {
        let clock = Rc::new(ManualClock::new());
        let (mut cd, log) = helper(clock.clone());
        cd.confirm("x".into()).unwrap();
        clock.advance(Duration::from_millis(3499));
        assert_eq!(cd.confirm("x".into()), Ok(ConfirmOutcome::Deleted));
        assert_eq!(*log.borrow(), vec!["x".to_string()]);
        assert_eq!(cd.pending_id(), None);
        assert_eq!(cd.state(), &DeleteGesture::Idle);
    }

    #[test]
    fn expiry_resets_the_gesture() {
        let clock = Rc::new(ManualClock::new());
        let (mut cd, log) = helper(clock.clone());
        cd.confirm("x".into()).unwrap();
        clock.advance(DEFAULT_CONFIRM_TIMEOUT);
        assert!(!cd.is_pending_delete(&"x".into()));
        assert_eq!(cd.confirm("x".into()), Ok(ConfirmOutcome::Armed));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn other_id_rearms_and_restarts_deadline() {
        let clock = Rc::new(ManualClock::new());
        let (mut cd, log) = helper(clock.clone());
        cd.confirm("a".into()).unwrap();
        clock.advance(Duration::from_millis(3000));
        cd.confirm("b".into()).unwrap();
        assert!(!cd.is_pending_delete(&"a".into()));
        clock.advance(Duration::from_millis(3000));
        assert!(cd.is_pending_delete(&"b".into()));
        assert_eq!(cd.confirm("a".into()), Ok(ConfirmOutcome::Armed));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn cancel_clears() {
        let clock = Rc::new(ManualClock::new());
        let (mut cd, log) = helper(clock);
        cd.confirm("x".into()).unwrap();
        cd.cancel();
        assert_eq!(cd.pending_id(), None);
        assert_eq!(cd.confirm("x".into()), Ok(ConfirmOutcome::Armed));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn tick_drops_expired_arm() {
        let clock = Rc::new(ManualClock::new());
        let (mut cd, _log) = helper(clock.clone());
        assert!(!cd.tick());
        cd.confirm("x".into()).unwrap();
        assert!(!cd.tick());
        clock.advance(Duration::from_secs(4));
        assert!(matches!(cd.state(), DeleteGesture::Armed { .. }));
        assert!(cd.tick());
        assert_eq!(cd.state(), &DeleteGesture::Idle);
    }

    #[test]
    fn failed_action_propagates_and_stays_armed() {
        let clock = Rc::new(ManualClock::new());
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let mut cd = ConfirmDelete::with_clock(
            move |_: &u32| {
                counter.set(counter.get() + 1);
                if counter.get() == 1 {
                    Err("backend offline")
                } else {
                    Ok(())
                }
            },
            DEFAULT_CONFIRM_TIMEOUT,
            clock.clone(),
        );
        cd.confirm(7).unwrap();
        clock.advance(Duration::from_millis(3000));
        assert_eq!(cd.confirm(7), Err("backend offline"));
        assert!(cd.is_pending_delete(&7));

        // The failed attempt restarted the deadline.
        clock.advance(Duration::from_millis(3000));
        assert!(cd.is_pending_delete(&7));
        assert_eq!(cd.confirm(7), Ok(ConfirmOutcome::Deleted));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn icon_and_class_follow_state() {
        let clock = Rc::new(ManualClock::new());
        let (mut cd, _log) = helper(clock);
        let x = String::from("x");
        assert_eq!(cd.delete_icon(&x), ICON_IDLE);
        assert_eq!(cd.button_class(&x, None).to_string(), "delete-btn");
        cd.confirm(x.clone()).unwrap();
        assert_eq!(cd.delete_icon(&x), ICON_ARMED);
        assert_eq!(cd.button_class(&x, None).to_string(), "delete-btn confirm-delete");
        assert_eq!(
            cd.button_class(&x, Some("keyword-remove")).classes(),
            vec!["keyword-remove", "confirm-delete"]
        );
        assert_eq!(cd.delete_icon(&"y".to_string()), ICON_IDLE);
    }

    #[test]
    fn title_uses_translator() {
        let mut en = MessageBundle::new();
        en.insert("pages.priority.item.deleteTitle", "Delete keyword");
        en.insert("pages.priority.item.confirmDeleteTitle", "Click again to confirm deletion");
        let mut engine = TranslationEngine::new(SupportedLocale::En, SupportedLocale::En);
        engine.register(SupportedLocale::En, en);

        let clock = Rc::new(ManualClock::new());
        let (mut cd, _log) = helper(clock);
        let id = String::from("1080p");
        let keys = (
            "pages.priority.item.confirmDeleteTitle",
            "pages.priority.item.deleteTitle",
        );
        assert_eq!(cd.button_title(&id, &engine, keys.0, keys.1), "Delete keyword");
        cd.confirm(id.clone()).unwrap();
        assert_eq!(
            cd.button_title(&id, &engine, keys.0, keys.1),
            "Click again to confirm deletion"
        );
        assert_eq!(cd.button_title(&id, &KeyEcho, keys.0, keys.1), keys.0);
    }
}
