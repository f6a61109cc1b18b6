//! Screen geometry and hit regions for the 240x320 portrait panel.
//!
//! Regions are checked in declaration order and the first match wins. Bounds
//! are inclusive on every edge, so a region spans `w + 1` by `h + 1` pixels.

use super::ScreenState;
use crate::touch::ScreenPoint;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    #[must_use]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn contains(&self, point: ScreenPoint) -> bool {
        let (x, y) = (u32::from(point.x), u32::from(point.y));
        x >= u32::from(self.x)
            && x <= u32::from(self.x) + u32::from(self.w)
            && y >= u32::from(self.y)
            && y <= u32::from(self.y) + u32::from(self.h)
    }

    /// Point halfway across both axes.
    #[must_use]
    pub const fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// Something the user can press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    AdminIcon,
    JoinQueue,
    /// Hex keypad digit, `0..=15`.
    Key(u8),
    Back,
    Clear,
    Delete,
    Enter,
    ViewQueue,
    TimeSetting,
    ChangePassword,
    Confirm,
    Close,
    Yes,
    No,
    Increment,
    Decrement,
    /// Zero-based slot in the queue list.
    QueueSlot(u8),
}

/// Keypad labels in row-major order.
pub const KEY_LABELS: [&str; 16] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "A", "B", "C", "D", "E", "F",
];

impl Control {
    /// Caption painted on the button. Queue slots are labelled by their ticket.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Control::AdminIcon | Control::QueueSlot(_) => "",
            Control::JoinQueue => "GET TICKET",
            Control::Key(digit) => KEY_LABELS.get(usize::from(digit)).copied().unwrap_or("?"),
            Control::Back => "BACK",
            Control::Clear => "CLR",
            Control::Delete => "DEL",
            Control::Enter => "ENTER",
            Control::ViewQueue => "VIEW QUEUE",
            Control::TimeSetting => "TIME SETTING",
            Control::ChangePassword => "PASSWORD",
            Control::Confirm => "OK",
            Control::Close => "X",
            Control::Yes => "YES",
            Control::No => "NO",
            Control::Increment => "+",
            Control::Decrement => "-",
        }
    }

    /// Character appended to a PIN buffer by a keypad press.
    #[must_use]
    pub fn key_char(self) -> Option<char> {
        match self {
            Control::Key(digit) => char::from_digit(u32::from(digit), 16)
                .map(|c| c.to_ascii_uppercase()),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub rect: Rect,
    pub control: Control,
}

impl Region {
    #[must_use]
    pub const fn new(rect: Rect, control: Control) -> Self {
        Self { rect, control }
    }
}

/// Result of a successful hit test.
pub type Hit = Region;

pub const SCREEN_WIDTH: u16 = 240;
pub const SCREEN_HEIGHT: u16 = 320;
pub const ICON_SIZE: u16 = 32;

/// Title baseline shared by every full screen.
pub const TITLE_Y: u16 = 12;

pub const ADMIN_ICON: Rect = Rect::new(200, 8, ICON_SIZE, ICON_SIZE);
pub const BACK_ICON: Rect = Rect::new(8, 8, ICON_SIZE, ICON_SIZE);

pub const QUEUE_LENGTH_LINE: Rect = Rect::new(0, 110, SCREEN_WIDTH, 24);
pub const WAIT_TIME_LINE: Rect = Rect::new(0, 150, SCREEN_WIDTH, 24);
pub const JOIN_BUTTON: Rect = Rect::new(20, 220, 200, 60);

pub const PIN_FIELD: Rect = Rect::new(20, 44, 200, 36);

const KEY_ORIGIN_X: u16 = 20;
const KEY_ORIGIN_Y: u16 = 90;
const KEY_W: u16 = 48;
const KEY_H: u16 = 40;
const KEY_GAP: u16 = 4;

#[allow(clippy::cast_possible_truncation)]
const fn keypad() -> [Region; 16] {
    let mut keys = [Region::new(Rect::new(0, 0, 0, 0), Control::Key(0)); 16];
    let mut index = 0;
    while index < keys.len() {
        let column = (index % 4) as u16;
        let row = (index / 4) as u16;
        keys[index] = Region::new(
            Rect::new(
                KEY_ORIGIN_X + column * (KEY_W + KEY_GAP),
                KEY_ORIGIN_Y + row * (KEY_H + KEY_GAP),
                KEY_W,
                KEY_H,
            ),
            Control::Key(index as u8),
        );
        index += 1;
    }
    keys
}

pub const KEYPAD: [Region; 16] = keypad();

pub const ENTRY_FUNCTIONS: [Region; 4] = [
    Region::new(Rect::new(4, 272, 54, 40), Control::Back),
    Region::new(Rect::new(62, 272, 54, 40), Control::Clear),
    Region::new(Rect::new(120, 272, 54, 40), Control::Delete),
    Region::new(Rect::new(178, 272, 58, 40), Control::Enter),
];

const USER_MAIN: [Region; 2] = [
    Region::new(ADMIN_ICON, Control::AdminIcon),
    Region::new(JOIN_BUTTON, Control::JoinQueue),
];

const ADMIN_MAIN: [Region; 4] = [
    Region::new(BACK_ICON, Control::Back),
    Region::new(Rect::new(20, 70, 200, 50), Control::ViewQueue),
    Region::new(Rect::new(20, 140, 200, 50), Control::TimeSetting),
    Region::new(Rect::new(20, 210, 200, 50), Control::ChangePassword),
];

pub const CONFIRM_BUTTON: Rect = Rect::new(60, 250, 120, 50);
const CONFIRM_ONLY: [Region; 1] = [Region::new(CONFIRM_BUTTON, Control::Confirm)];

pub const MODAL_BOX: Rect = Rect::new(20, 100, 200, 120);
const CALL_MODAL: [Region; 1] = [Region::new(Rect::new(70, 170, 100, 36), Control::Close)];

pub const LIST_CLOSE: Rect = Rect::new(200, 4, 36, 30);
const QUEUE_LIST: [Region; 1] = [Region::new(LIST_CLOSE, Control::Close)];

pub const DIALOG_BOX: Rect = Rect::new(20, 90, 200, 140);
const DELETE_CONFIRM: [Region; 3] = [
    Region::new(Rect::new(190, 94, 26, 26), Control::Close),
    Region::new(Rect::new(36, 170, 76, 44), Control::Yes),
    Region::new(Rect::new(128, 170, 76, 44), Control::No),
];

pub const SERVICE_TIME_VALUE: Rect = Rect::new(90, 130, 60, 40);
const TIME_SETTING: [Region; 3] = [
    Region::new(Rect::new(20, 120, 60, 60), Control::Decrement),
    Region::new(Rect::new(160, 120, 60, 60), Control::Increment),
    Region::new(CONFIRM_BUTTON, Control::Confirm),
];

/// Number of slots the queue list can show at once.
pub const QUEUE_SLOTS: usize = 20;
const SLOT_ORIGIN_X: u16 = 10;
const SLOT_ORIGIN_Y: u16 = 44;
const SLOT_W: u16 = 106;
const SLOT_H: u16 = 23;
const SLOT_STRIDE_X: u16 = 114;
const SLOT_STRIDE_Y: u16 = 27;

/// Bounds of list slot `index`, laid out two per row.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn queue_slot(index: usize) -> Option<Rect> {
    if index >= QUEUE_SLOTS {
        return None;
    }
    let column = (index % 2) as u16;
    let row = (index / 2) as u16;
    Some(Rect::new(
        SLOT_ORIGIN_X + column * SLOT_STRIDE_X,
        SLOT_ORIGIN_Y + row * SLOT_STRIDE_Y,
        SLOT_W,
        SLOT_H,
    ))
}

/// Static region groups for `state`, in priority order.
#[must_use]
pub const fn regions(state: ScreenState) -> &'static [&'static [Region]] {
    match state {
        ScreenState::UserMain => &[&USER_MAIN],
        ScreenState::AdminLogin | ScreenState::PasswordChange => &[&KEYPAD, &ENTRY_FUNCTIONS],
        ScreenState::AdminMain => &[&ADMIN_MAIN],
        ScreenState::TicketIssued | ScreenState::QueueFull => &[&CONFIRM_ONLY],
        ScreenState::CallModal => &[&CALL_MODAL],
        ScreenState::QueueList => &[&QUEUE_LIST],
        ScreenState::QueueDeleteConfirm => &[&DELETE_CONFIRM],
        ScreenState::TimeSetting => &[&TIME_SETTING],
    }
}

/// Finds the control under `point`. Queue slots only count while occupied.
#[must_use]
pub fn hit_test(state: ScreenState, point: ScreenPoint, queue_len: usize) -> Option<Hit> {
    let fixed = regions(state)
        .iter()
        .flat_map(|group| group.iter())
        .find(|region| region.rect.contains(point))
        .copied();
    if fixed.is_some() || state != ScreenState::QueueList {
        return fixed;
    }

    (0..queue_len.min(QUEUE_SLOTS)).find_map(|index| {
        let rect = queue_slot(index)?;
        let slot = u8::try_from(index).ok()?;
        rect.contains(point)
            .then_some(Region::new(rect, Control::QueueSlot(slot)))
    })
}

/// Region for `control` on `state`, used to restore a flashed button.
#[must_use]
pub fn region_of(state: ScreenState, control: Control) -> Option<Region> {
    if let Control::QueueSlot(slot) = control {
        return queue_slot(usize::from(slot)).map(|rect| Region::new(rect, control));
    }
    regions(state)
        .iter()
        .flat_map(|group| group.iter())
        .find(|region| region.control == control)
        .copied()
}
