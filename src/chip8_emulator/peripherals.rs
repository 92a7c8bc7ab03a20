use crate::chip8_emulator::config::{KEY_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Monochrome bitmap the CPU draws into. Coordinates passed in are already
/// wrapped to the screen; collision logic lives in the CPU.
pub trait DisplaySink {
    fn clear(&mut self);
    fn pixel(&self, x: usize, y: usize) -> bool;
    fn set_pixel(&mut self, x: usize, y: usize, lit: bool);
}

/// Hex keypad as seen by the CPU. Keys are `0x0..=0xF`.
pub trait Keypad {
    fn is_key_down(&self, key: u8) -> bool;

    /// Returns a key that went from up to down since the previous call, if any.
    fn take_key_press(&mut self) -> Option<u8>;
}

/// Borrowed view of the collaborators an instruction may touch.
pub struct Peripherals<'a> {
    pub display: &'a mut dyn DisplaySink,
    pub keypad: &'a mut dyn Keypad,
}

impl<'a> Peripherals<'a> {
    pub fn new(display: &'a mut dyn DisplaySink, keypad: &'a mut dyn Keypad) -> Self {
        Self { display, keypad }
    }
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub pixels: [u8; SCREEN_WIDTH * SCREEN_HEIGHT],
    pub should_draw: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self {
            pixels: [0; SCREEN_WIDTH * SCREEN_HEIGHT],
            should_draw: true,
        }
    }
}

impl FrameBuffer {
    pub fn lit_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| **pixel == 1).count()
    }
}

impl DisplaySink for FrameBuffer {
    fn clear(&mut self) {
        self.pixels = [0; SCREEN_WIDTH * SCREEN_HEIGHT];
        self.should_draw = true;
    }

    fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[x + (y * SCREEN_WIDTH)] == 1
    }

    fn set_pixel(&mut self, x: usize, y: usize, lit: bool) {
        self.pixels[x + (y * SCREEN_WIDTH)] = u8::from(lit);
        self.should_draw = true;
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyState {
    keys: [bool; KEY_COUNT],
    pending_press: Option<u8>,
}

impl KeyState {
    /// Records the current up/down state of a key. Out of range keys are ignored.
    pub fn set_key_state(&mut self, key_index: usize, is_pressed: bool) {
        if key_index >= KEY_COUNT {
            return;
        }

        if is_pressed && !self.keys[key_index] {
            self.pending_press = Some(key_index as u8);
        }
        self.keys[key_index] = is_pressed;
    }

    pub fn first_pressed_key(&self) -> Option<u8> {
        self.keys
            .iter()
            .position(|pressed| *pressed)
            .map(|index| index as u8)
    }
}

impl Keypad for KeyState {
    fn is_key_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    fn take_key_press(&mut self) -> Option<u8> {
        self.pending_press.take()
    }
}

/// Owned frame buffer and keypad, for embedders that don't bring their own.
#[derive(Debug, Clone, Default)]
pub struct Devices {
    pub frame: FrameBuffer,
    pub keys: KeyState,
}

impl Devices {
    pub fn attach(&mut self) -> Peripherals<'_> {
        Peripherals::new(&mut self.frame, &mut self.keys)
    }
}
