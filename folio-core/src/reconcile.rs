//! Per-field value reconciliation.
//!
//! A [`ValueController`] sits between a control and the entry draft. For
//! uncontrolled fields it keeps an edit buffer seeded once at mount and
//! propagates the last edit after a trailing [`DEBOUNCE_WINDOW`] of quiet.
//! Controlled fields mirror the external value and never propagate edits.
//!
//! The controller is synchronous and takes the current time as an argument;
//! [`DebouncedControl`] drives it on the tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::path::FieldPath;
use crate::registry::{Control, ControlProps, WidgetDefinition};
use crate::schema::{FieldSchema, I18nMode};

/// Quiet period after the last edit before it propagates.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);

/// Trailing, resettable, cancellable debounce of one value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    /// A debouncer with the given quiet period.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// When the pending value becomes ready.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending value, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Whether a value is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

/// Flags deciding whether a field is controlled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags {
    /// The caller owns the value.
    pub controlled: bool,
    /// The field is shown for a non-default locale of a duplicated field.
    pub duplicate: bool,
}

impl ControlFlags {
    /// Whether a field with these flags mirrors the external value.
    #[must_use]
    pub fn is_controlled(self, field: &FieldSchema) -> bool {
        self.controlled || (field.i18n == I18nMode::Duplicate && self.duplicate)
    }
}

impl From<&ControlProps<'_>> for ControlFlags {
    fn from(props: &ControlProps<'_>) -> Self {
        Self {
            controlled: props.controlled,
            duplicate: props.duplicate,
        }
    }
}

/// A value leaving a control for the draft.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    /// Field path.
    pub path: FieldPath,
    /// New value.
    pub value: Value,
}

/// Reconciles a control's edits with the externally supplied value.
pub struct ValueController {
    path: FieldPath,
    field: FieldSchema,
    control: Arc<dyn Control>,
    controlled: bool,
    external: Value,
    buffer: Value,
    input: Value,
    debouncer: Debouncer<Value>,
}

impl ValueController {
    /// Create a controller from mount props.
    #[must_use]
    pub fn new(definition: &WidgetDefinition, props: &ControlProps<'_>) -> Self {
        let flags = ControlFlags::from(props);
        Self {
            path: props.path.clone(),
            field: props.field.clone(),
            control: Arc::clone(&definition.control),
            controlled: flags.is_controlled(props.field),
            external: props.value.clone(),
            buffer: props.value.clone(),
            input: props.value.clone(),
            debouncer: Debouncer::default(),
        }
    }

    /// Run the control's mount hook.
    ///
    /// A replacement value becomes the buffer and propagates right away.
    pub fn mount(&mut self) -> Option<Propagation> {
        let value = self.control.on_mount(&self.field, &self.external)?;
        debug!(path = %self.path, "Control replaced its initial value");
        self.buffer = value.clone();
        self.input = value.clone();
        self.external = value.clone();
        Some(Propagation {
            path: self.path.clone(),
            value,
        })
    }

    /// Field path.
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Whether the displayed value mirrors the external value.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Value the control shows.
    #[must_use]
    pub fn displayed_value(&self) -> &Value {
        if self.controlled {
            &self.external
        } else {
            &self.buffer
        }
    }

    /// Transient input of a controlled field.
    #[must_use]
    pub fn input_value(&self) -> &Value {
        &self.input
    }

    /// Record a user edit.
    ///
    /// Controlled fields only update the transient input. Uncontrolled
    /// fields update the buffer and restart the debounce.
    pub fn edit(&mut self, value: Value, now: Instant) {
        if self.controlled {
            self.input = value;
            return;
        }
        self.buffer = value.clone();
        self.debouncer.push(value, now);
    }

    /// Record a new external value.
    ///
    /// The buffer of an uncontrolled field is never overwritten after mount.
    pub fn set_external(&mut self, value: Value) {
        if self.controlled {
            self.input = value.clone();
        }
        self.external = value;
    }

    /// Propagate the buffered edit once its quiet period has elapsed.
    ///
    /// Values equal to the external value, or of the wrong type for the
    /// control, are dropped. A propagated value is what the draft now holds,
    /// so it becomes the external value.
    pub fn poll(&mut self, now: Instant) -> Option<Propagation> {
        let value = self.debouncer.poll(now)?;
        if value == self.external {
            debug!(path = %self.path, "Edit matches external value; not propagating");
            return None;
        }
        let expected = self.control.value_type();
        if !expected.accepts(&value) {
            warn!(path = %self.path, ?expected, "Dropping value of the wrong type");
            return None;
        }
        debug!(path = %self.path, "Propagating edit");
        self.external = value.clone();
        Some(Propagation {
            path: self.path.clone(),
            value,
        })
    }

    /// When the pending edit becomes ready.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Ask the control for a fresh value and propagate it immediately.
    pub fn regenerate(&mut self) -> Option<Propagation> {
        if self.controlled {
            return None;
        }
        let value = self.control.regenerate(&self.field)?;
        self.debouncer.cancel();
        self.buffer = value.clone();
        self.external = value.clone();
        Some(Propagation {
            path: self.path.clone(),
            value,
        })
    }

    /// Drop any pending edit.
    pub fn unmount(&mut self) {
        if self.debouncer.cancel().is_some() {
            debug!(path = %self.path, "Discarded pending edit on unmount");
        }
    }
}

enum Command {
    Edit(Value),
    External(Value),
}

/// A [`ValueController`] running on the tokio runtime.
///
/// Propagations are sent to the sink channel. Dropping the handle aborts
/// the task, so nothing propagates after unmount.
pub struct DebouncedControl {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl DebouncedControl {
    /// Mount `controller` and start driving it.
    #[must_use]
    pub fn spawn(mut controller: ValueController, sink: mpsc::UnboundedSender<Propagation>) -> Self {
        if let Some(mounted) = controller.mount() {
            if sink.send(mounted).is_err() {
                debug!(path = %controller.path(), "Propagation sink closed at mount");
            }
        }

        let (commands, mut rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            loop {
                let deadline = controller.next_deadline();
                tokio::select! {
                    command = rx.recv() => match command {
                        Some(Command::Edit(value)) => controller.edit(value, Instant::now()),
                        Some(Command::External(value)) => controller.set_external(value),
                        None => break,
                    },
                    () = wait_for(deadline) => {
                        if let Some(propagation) = controller.poll(Instant::now()) {
                            if sink.send(propagation).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
            controller.unmount();
        });

        Self { commands, task }
    }

    /// Forward a user edit.
    pub fn edit(&self, value: Value) {
        if self.commands.send(Command::Edit(value)).is_err() {
            debug!("Control task already stopped; edit ignored");
        }
    }

    /// Forward a new external value.
    pub fn set_external(&self, value: Value) {
        if self.commands.send(Command::External(value)).is_err() {
            debug!("Control task already stopped; external value ignored");
        }
    }
}

impl Drop for DebouncedControl {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
