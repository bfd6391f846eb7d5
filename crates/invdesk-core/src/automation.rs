//! Keystroke automation of the external registration application.
//!
//! The automator switches to the other window with alt+tab, types the
//! invoice fields assuming a fixed form layout, and switches back. Nothing
//! is read back from the external application.

use std::fmt;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::AutomationError;
use crate::models::config::{AutomationBackend, AutomationConfig};
use crate::models::invoice::Invoice;

/// Result type for automation.
pub type Result<T> = std::result::Result<T, AutomationError>;

/// Keys the scripts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyName {
    Alt,
    Tab,
    Down,
    Shift,
}

impl KeyName {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyName::Alt => "alt",
            KeyName::Tab => "tab",
            KeyName::Down => "down",
            KeyName::Shift => "shift",
        }
    }
}

/// One step of a key script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Press the keys in order, release them in reverse.
    Chord(Vec<KeyName>),
    /// Type literal text.
    Text(String),
    /// Tap a key `times` times.
    Press { key: KeyName, times: u32 },
    /// Hold a key down until released.
    Hold(KeyName),
    Release(KeyName),
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAction::Chord(keys) => {
                let names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
                write!(f, "chord {}", names.join("+"))
            }
            KeyAction::Text(text) => write!(f, "text {:?}", text),
            KeyAction::Press { key, times } => write!(f, "press {} x{}", key.as_str(), times),
            KeyAction::Hold(key) => write!(f, "hold {}", key.as_str()),
            KeyAction::Release(key) => write!(f, "release {}", key.as_str()),
        }
    }
}

/// Ordered list of key actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyScript {
    actions: Vec<KeyAction>,
}

impl KeyScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chord(mut self, keys: &[KeyName]) -> Self {
        self.actions.push(KeyAction::Chord(keys.to_vec()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.actions.push(KeyAction::Text(text.into()));
        self
    }

    pub fn press(mut self, key: KeyName, times: u32) -> Self {
        self.actions.push(KeyAction::Press { key, times });
        self
    }

    pub fn hold(mut self, key: KeyName) -> Self {
        self.actions.push(KeyAction::Hold(key));
        self
    }

    pub fn release(mut self, key: KeyName) -> Self {
        self.actions.push(KeyAction::Release(key));
        self
    }

    pub fn actions(&self) -> &[KeyAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Window switch between this tool and the external application.
pub fn window_switch() -> KeyAction {
    KeyAction::Chord(vec![KeyName::Alt, KeyName::Tab])
}

/// Keys that fill the registration form for `invoice`.
///
/// Fails if the invoice has no date or no work order.
pub fn enter_script(invoice: &Invoice) -> Result<KeyScript> {
    let date = invoice
        .timestamp
        .ok_or_else(|| AutomationError::Incomplete(invoice.file_name(), "no invoice date"))?;
    let work_order = invoice
        .work_order
        .as_deref()
        .ok_or_else(|| AutomationError::Incomplete(invoice.file_name(), "no work order"))?;

    Ok(KeyScript::new()
        .text(date.format("%d%m%y").to_string())
        .press(KeyName::Tab, 1)
        .text(invoice.number.to_string())
        .press(KeyName::Down, 2)
        .text(invoice.amount_display())
        .press(KeyName::Down, 3)
        .press(KeyName::Tab, 1)
        .text(work_order))
}

/// Keys that move focus to the upload control.
pub fn upload_script() -> KeyScript {
    KeyScript::new()
        .hold(KeyName::Shift)
        .press(KeyName::Tab, 7)
        .release(KeyName::Shift)
}

/// Receiver of key actions.
pub trait KeySink {
    fn send(&mut self, action: &KeyAction) -> Result<()>;
}

/// Sink that only logs what would be typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl KeySink for LogSink {
    fn send(&mut self, action: &KeyAction) -> Result<()> {
        info!("[dry run] {}", action);
        Ok(())
    }
}

impl<S: KeySink + ?Sized> KeySink for Box<S> {
    fn send(&mut self, action: &KeyAction) -> Result<()> {
        (**self).send(action)
    }
}

/// Drives the external application for one invoice.
pub trait Automator {
    /// Type the invoice into the registration form.
    fn enter(&mut self, invoice: &Invoice) -> Result<()>;

    /// Move focus to the upload control for the invoice.
    fn upload(&mut self, invoice: &Invoice) -> Result<()>;
}

impl<A: Automator + ?Sized> Automator for Box<A> {
    fn enter(&mut self, invoice: &Invoice) -> Result<()> {
        (**self).enter(invoice)
    }

    fn upload(&mut self, invoice: &Invoice) -> Result<()> {
        (**self).upload(invoice)
    }
}

/// Automator that plays key scripts on a [`KeySink`].
pub struct KeystrokeAutomator<S> {
    sink: S,
    action_delay: Duration,
}

impl<S: KeySink> KeystrokeAutomator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            action_delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive actions.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.action_delay = delay;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Switch window, play `script`, switch back.
    ///
    /// The switch back is sent even when the script fails; the first error
    /// wins.
    pub fn run(&mut self, script: &KeyScript) -> Result<()> {
        debug!("Playing key script with {} actions", script.len());
        self.send(&window_switch())?;

        let body = script.actions().iter().try_for_each(|action| self.send(action));
        if let Err(e) = &body {
            warn!("Key script interrupted: {}", e);
        }

        let back = self.send(&window_switch());
        body.and(back)
    }

    fn send(&mut self, action: &KeyAction) -> Result<()> {
        if !self.action_delay.is_zero() {
            thread::sleep(self.action_delay);
        }
        self.sink.send(action)
    }
}

impl<S: KeySink> Automator for KeystrokeAutomator<S> {
    fn enter(&mut self, invoice: &Invoice) -> Result<()> {
        let script = enter_script(invoice)?;
        info!("Entering invoice {} ({})", invoice.number, invoice.file_name());
        self.run(&script)
    }

    fn upload(&mut self, invoice: &Invoice) -> Result<()> {
        info!("Uploading {}", invoice.file_name());
        self.run(&upload_script())
    }
}

/// Build the automator selected in the configuration.
pub fn from_config(config: &AutomationConfig) -> Result<KeystrokeAutomator<Box<dyn KeySink>>> {
    let sink: Box<dyn KeySink> = match config.backend {
        AutomationBackend::Log => Box::new(LogSink),
        AutomationBackend::Keyboard => keyboard_sink()?,
    };
    Ok(KeystrokeAutomator::new(sink).with_delay(Duration::from_millis(config.action_delay_ms)))
}

#[cfg(feature = "keystrokes")]
fn keyboard_sink() -> Result<Box<dyn KeySink>> {
    Ok(Box::new(EnigoSink::new()?))
}

#[cfg(not(feature = "keystrokes"))]
fn keyboard_sink() -> Result<Box<dyn KeySink>> {
    Err(AutomationError::Unavailable(
        "built without the keystrokes feature".to_string(),
    ))
}

#[cfg(feature = "keystrokes")]
pub use self::keyboard::EnigoSink;

#[cfg(feature = "keystrokes")]
mod keyboard {
    use enigo::{Direction, Enigo, Key, Keyboard, Settings};

    use super::{KeyAction, KeyName, KeySink, Result};
    use crate::error::AutomationError;

    /// Sink that sends real key events through the OS.
    pub struct EnigoSink {
        enigo: Enigo,
    }

    impl EnigoSink {
        pub fn new() -> Result<Self> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| AutomationError::Unavailable(e.to_string()))?;
            Ok(Self { enigo })
        }

        fn key(&mut self, action: &KeyAction, key: KeyName, direction: Direction) -> Result<()> {
            self.enigo
                .key(to_key(key), direction)
                .map_err(|e| AutomationError::Input {
                    action: action.to_string(),
                    reason: e.to_string(),
                })
        }
    }

    fn to_key(key: KeyName) -> Key {
        match key {
            KeyName::Alt => Key::Alt,
            KeyName::Tab => Key::Tab,
            KeyName::Down => Key::DownArrow,
            KeyName::Shift => Key::Shift,
        }
    }

    impl KeySink for EnigoSink {
        fn send(&mut self, action: &KeyAction) -> Result<()> {
            match action {
                KeyAction::Chord(keys) => {
                    for key in keys {
                        self.key(action, *key, Direction::Press)?;
                    }
                    for key in keys.iter().rev() {
                        self.key(action, *key, Direction::Release)?;
                    }
                    Ok(())
                }
                KeyAction::Text(text) => {
                    self.enigo
                        .text(text)
                        .map_err(|e| AutomationError::Input {
                            action: action.to_string(),
                            reason: e.to_string(),
                        })
                }
                KeyAction::Press { key, times } => {
                    for _ in 0..*times {
                        self.key(action, *key, Direction::Click)?;
                    }
                    Ok(())
                }
                KeyAction::Hold(key) => self.key(action, *key, Direction::Press),
                KeyAction::Release(key) => self.key(action, *key, Direction::Release),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    /// Records actions and fails on the `fail_at`-th one.
    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<KeyAction>,
        fail_at: Option<usize>,
    }

    impl KeySink for RecordingSink {
        fn send(&mut self, action: &KeyAction) -> Result<()> {
            let index = self.sent.len();
            self.sent.push(action.clone());
            if self.fail_at == Some(index) {
                return Err(AutomationError::Input {
                    action: action.to_string(),
                    reason: "window gone".to_string(),
                });
            }
            Ok(())
        }
    }

    fn invoice() -> Invoice {
        let mut invoice = Invoice::unrecognized("/work/a.pdf");
        invoice.number = 4711;
        invoice.timestamp = NaiveDate::from_ymd_opt(2024, 2, 1);
        invoice.amount = "1234.56".parse().unwrap();
        invoice.work_order = Some("900001".to_string());
        invoice
    }

    #[test]
    fn test_enter_sequence() {
        let mut automator = KeystrokeAutomator::new(RecordingSink::default());
        automator.enter(&invoice()).unwrap();

        assert_eq!(
            automator.sink().sent,
            vec![
                window_switch(),
                KeyAction::Text("010224".to_string()),
                KeyAction::Press { key: KeyName::Tab, times: 1 },
                KeyAction::Text("4711".to_string()),
                KeyAction::Press { key: KeyName::Down, times: 2 },
                KeyAction::Text("1234,56".to_string()),
                KeyAction::Press { key: KeyName::Down, times: 3 },
                KeyAction::Press { key: KeyName::Tab, times: 1 },
                KeyAction::Text("900001".to_string()),
                window_switch(),
            ]
        );
    }

    #[test]
    fn test_upload_sequence() {
        let mut automator = KeystrokeAutomator::new(RecordingSink::default());
        automator.upload(&invoice()).unwrap();

        assert_eq!(
            automator.sink().sent,
            vec![
                window_switch(),
                KeyAction::Hold(KeyName::Shift),
                KeyAction::Press { key: KeyName::Tab, times: 7 },
                KeyAction::Release(KeyName::Shift),
                window_switch(),
            ]
        );
    }

    #[test]
    fn test_switch_back_after_failure() {
        let sink = RecordingSink {
            fail_at: Some(2),
            ..Default::default()
        };
        let mut automator = KeystrokeAutomator::new(sink);

        let result = automator.enter(&invoice());
        assert!(matches!(result, Err(AutomationError::Input { .. })));

        let sent = &automator.sink().sent;
        assert_eq!(sent.len(), 4);
        assert_eq!(sent.last(), Some(&window_switch()));
    }

    #[test]
    fn test_incomplete_invoice_sends_nothing() {
        let mut automator = KeystrokeAutomator::new(RecordingSink::default());
        let mut incomplete = invoice();
        incomplete.work_order = None;

        let result = automator.enter(&incomplete);
        assert!(matches!(result, Err(AutomationError::Incomplete(_, "no work order"))));
        assert!(automator.sink().sent.is_empty());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(window_switch().to_string(), "chord alt+tab");
        assert_eq!(
            KeyAction::Press { key: KeyName::Down, times: 3 }.to_string(),
            "press down x3"
        );
    }

    #[test]
    fn test_log_backend_from_config() {
        let mut automator = from_config(&AutomationConfig {
            backend: AutomationBackend::Log,
            action_delay_ms: 0,
        })
        .unwrap();
        assert!(automator.upload(&invoice()).is_ok());
    }
}
