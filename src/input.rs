use crate::error::Result;
use crate::timing::StopHandle;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// the COSMAC hex keypad mapped onto the left-hand side of a qwerty keyboard
///   1 2 3 C      1 2 3 4
///   4 5 6 D  ->  q w e r
///   7 8 9 E      a s d f
///   A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals don't report key releases, so a key counts as held for this
/// long after its last press (or auto-repeat)
const KEY_HOLD: Duration = Duration::from_millis(150);

/// reads keypresses
pub trait Input {
    /// get a list of all the mapped keys that are currently held, without
    /// flushing them from the buffer
    fn peek_keys(&mut self) -> Result<&[u8]>;

    /// flush all the keypresses from the buffer
    fn flush_keys(&mut self) -> Result<()>;

    /// is hex key `key` down right now; never blocks
    fn is_pressed(&mut self, key: u8) -> Result<bool> {
        Ok(self.peek_keys()?.contains(&key))
    }

    /// take the next key if there is one; never blocks, the interpreter
    /// retries instead
    fn take_key(&mut self) -> Result<Option<u8>> {
        let key = self.peek_keys()?.first().copied();
        if key.is_some() {
            self.flush_keys()?;
        }
        Ok(key)
    }
}

/// terminal keyboard, using crossterm in raw mode
pub struct StdinInput {
    buffer: Vec<u8>,
    held: Vec<(u8, Instant)>,
    keymap: HashMap<char, u8>,
    stop: StopHandle,
}

impl StdinInput {
    /// Esc and ctrl-c raise `stop`, since raw mode swallows the signal
    pub fn new(stop: StopHandle) -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            buffer: Vec::new(),
            held: Vec::new(),
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            stop,
        })
    }

    fn read_stdin(&mut self) -> Result<()> {
        let now = Instant::now();
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(KeyEvent {
                    code: KeyCode::Esc, ..
                }) => self.stop.stop(),
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers,
                    ..
                }) if modifiers.contains(KeyModifiers::CONTROL) => self.stop.stop(),
                Event::Key(KeyEvent {
                    code: KeyCode::Char(key),
                    ..
                }) => match self.keymap.get(&key.to_ascii_lowercase()) {
                    Some(&mapped_key) => {
                        self.held.retain(|&(k, _)| k != mapped_key);
                        self.held.push((mapped_key, now));
                    }
                    None => log::debug!("can't map {:?} to a COSMAC key", key),
                },
                Event::Resize(..) => {}
                evt => log::debug!("ignoring terminal event {:?}", evt),
            }
        }
        self.held.retain(|&(_, at)| now.duration_since(at) < KEY_HOLD);
        self.buffer.clear();
        self.buffer.extend(self.held.iter().map(|&(k, _)| k));
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("could not leave raw mode: {}", e);
        }
    }
}

impl Input for StdinInput {
    fn peek_keys(&mut self) -> Result<&[u8]> {
        self.read_stdin()?;
        Ok(self.buffer.as_slice())
    }

    fn flush_keys(&mut self) -> Result<()> {
        self.read_stdin()?;
        self.held.clear();
        self.buffer.clear();
        Ok(())
    }
}

/// no keyboard at all: nothing is ever pressed, and a key wait never ends
#[derive(Default)]
pub struct NullInput;

impl NullInput {
    pub fn new() -> Self {
        NullInput
    }
}

impl Input for NullInput {
    fn peek_keys(&mut self) -> Result<&[u8]> {
        Ok(&[])
    }

    fn flush_keys(&mut self) -> Result<()> {
        Ok(())
    }
}

/// fixed set of held keys, for testing
pub struct ScriptedInput {
    bytes: Vec<u8>,
}

impl ScriptedInput {
    pub fn new(keys: &[u8]) -> Self {
        ScriptedInput {
            bytes: Vec::from(keys),
        }
    }

    pub fn press(&mut self, key: u8) {
        self.bytes.push(key);
    }
}

impl Input for ScriptedInput {
    fn peek_keys(&mut self) -> Result<&[u8]> {
        Ok(self.bytes.as_slice())
    }

    fn flush_keys(&mut self) -> Result<()> {
        self.bytes.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_keypad() {
        let mut keys: Vec<u8> = CHIP8_CONVENTIONAL_KEYMAP.iter().map(|&(_, k)| k).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_null_input_never_pressed() -> Result<()> {
        let mut i = NullInput::new();
        for k in 0..16 {
            assert!(!i.is_pressed(k)?);
        }
        assert_eq!(i.take_key()?, None);
        Ok(())
    }

    #[test]
    fn test_scripted_is_pressed() -> Result<()> {
        let mut i = ScriptedInput::new(&[0x5, 0xa]);
        assert!(i.is_pressed(0xa)?);
        assert!(!i.is_pressed(0xb)?);
        Ok(())
    }

    #[test]
    fn test_take_key_flushes() -> Result<()> {
        let mut i = ScriptedInput::new(&[0x7, 0x2]);
        assert_eq!(i.take_key()?, Some(0x7));
        assert_eq!(i.take_key()?, None);
        i.press(0x3);
        assert_eq!(i.take_key()?, Some(0x3));
        Ok(())
    }
}
