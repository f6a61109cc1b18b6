use core::fmt::{self, Write as _};

use heapless::String;

use super::icons::{ADMIN_GEAR, BACK_ARROW};
use super::{ADMIN_BACKGROUND, Renderer, Rgb565, TextSize, USER_BACKGROUND};
use crate::clock::Millis;
use crate::screen::layout::{
    self, BACK_ICON, CONFIRM_BUTTON, DIALOG_BOX, ICON_SIZE, JOIN_BUTTON, MODAL_BOX, PIN_FIELD,
    QUEUE_LENGTH_LINE, QUEUE_SLOTS, SCREEN_HEIGHT, SCREEN_WIDTH, SERVICE_TIME_VALUE, TITLE_Y,
    WAIT_TIME_LINE,
};
use crate::screen::{Control, KioskContext, Rect, Region, ScreenState};
use crate::touch::ScreenPoint;

const FULL_SCREEN: Rect = Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT);
const BUTTON_FILL: Rgb565 = Rgb565::BLUE;
const BUTTON_TEXT: Rgb565 = Rgb565::WHITE;
const FLASH_FILL: Rgb565 = Rgb565::YELLOW;
const FLASH_TEXT: Rgb565 = Rgb565::BLACK;

type Line = String<32>;

fn line(args: fmt::Arguments<'_>) -> Line {
    let mut text = Line::new();
    // Overlong text is cut at the buffer size.
    let _ = text.write_fmt(args);
    text
}

fn background(state: ScreenState) -> Rgb565 {
    match state {
        ScreenState::UserMain | ScreenState::TicketIssued | ScreenState::QueueFull => {
            USER_BACKGROUND
        }
        _ => ADMIN_BACKGROUND,
    }
}

fn foreground(state: ScreenState) -> Rgb565 {
    if background(state) == USER_BACKGROUND {
        Rgb565::BLACK
    } else {
        Rgb565::WHITE
    }
}

/// Draws `text` centred horizontally inside `area`, vertically centred too.
fn centered_text<R: Renderer>(
    renderer: &mut R,
    area: Rect,
    text: &str,
    size: TextSize,
    color: Rgb565,
) -> Result<(), R::Error> {
    let width = size.text_width(text);
    let x = area.x + area.w.saturating_sub(width) / 2;
    let y = area.y + area.h.saturating_sub(size.glyph_height()) / 2;
    renderer.draw_text(ScreenPoint::new(x, y), text, size, color)
}

fn title<R: Renderer>(renderer: &mut R, state: ScreenState, text: &str) -> Result<(), R::Error> {
    let area = Rect::new(ICON_SIZE + 8, TITLE_Y, SCREEN_WIDTH - 2 * (ICON_SIZE + 8), 20);
    centered_text(renderer, area, text, TextSize::Large, foreground(state))
}

fn button<R: Renderer>(
    renderer: &mut R,
    rect: Rect,
    text: &str,
    fill: Rgb565,
    ink: Rgb565,
) -> Result<(), R::Error> {
    renderer.fill_rect(rect, fill)?;
    renderer.draw_rect(rect, Rgb565::WHITE)?;
    centered_text(renderer, rect, text, TextSize::Normal, ink)
}

/// Paints `region` in its resting colours.
///
/// # Errors
///
/// Propagates renderer failures.
pub fn paint_button<R: Renderer>(renderer: &mut R, region: Region) -> Result<(), R::Error> {
    match region.control {
        Control::AdminIcon => renderer.draw_bitmap(origin(region.rect), &ADMIN_GEAR),
        Control::Back if region.rect == BACK_ICON => {
            renderer.draw_bitmap(origin(region.rect), &BACK_ARROW)
        }
        control => button(renderer, region.rect, control.label(), BUTTON_FILL, BUTTON_TEXT),
    }
}

/// Highlights a pressed button until the runtime restores it.
///
/// # Errors
///
/// Propagates renderer failures.
pub fn paint_flash<R: Renderer>(renderer: &mut R, region: Region) -> Result<(), R::Error> {
    match region.control {
        Control::AdminIcon => renderer.draw_rect(region.rect, FLASH_FILL),
        Control::Back if region.rect == BACK_ICON => renderer.draw_rect(region.rect, FLASH_FILL),
        control => button(renderer, region.rect, control.label(), FLASH_FILL, FLASH_TEXT),
    }
}

const fn origin(rect: Rect) -> ScreenPoint {
    ScreenPoint::new(rect.x, rect.y)
}

fn paint_regions<R: Renderer>(renderer: &mut R, state: ScreenState) -> Result<(), R::Error> {
    for group in layout::regions(state) {
        for region in *group {
            paint_button(renderer, *region)?;
        }
    }
    Ok(())
}

/// Redraws the queue length and wait lines on the customer screen.
///
/// # Errors
///
/// Propagates renderer failures.
pub fn paint_wait_time<R: Renderer>(
    renderer: &mut R,
    ctx: &KioskContext,
    now: Millis,
) -> Result<(), R::Error> {
    let ink = foreground(ScreenState::UserMain);
    renderer.fill_rect(QUEUE_LENGTH_LINE, USER_BACKGROUND)?;
    let waiting = line(format_args!("Waiting: {}", ctx.queue.len()));
    centered_text(renderer, QUEUE_LENGTH_LINE, &waiting, TextSize::Normal, ink)?;

    renderer.fill_rect(WAIT_TIME_LINE, USER_BACKGROUND)?;
    let wait = line(format_args!("Wait: {}", ctx.current_wait(now)));
    centered_text(renderer, WAIT_TIME_LINE, &wait, TextSize::Large, ink)
}

/// Redraws the PIN field. The login screen masks the digits.
///
/// # Errors
///
/// Propagates renderer failures.
pub fn paint_pin_entry<R: Renderer>(
    renderer: &mut R,
    state: ScreenState,
    ctx: &KioskContext,
) -> Result<(), R::Error> {
    renderer.fill_rect(PIN_FIELD, Rgb565::BLACK)?;
    renderer.draw_rect(PIN_FIELD, Rgb565::WHITE)?;
    let text = if state == ScreenState::PasswordChange {
        line(format_args!("{}", ctx.admin.new.as_str()))
    } else {
        let mut masked = Line::new();
        for _ in 0..ctx.admin.entered.len() {
            let _ = masked.push('*');
        }
        masked
    };
    centered_text(renderer, PIN_FIELD, &text, TextSize::Large, Rgb565::GREEN)
}

/// Redraws the per-ticket service time value.
///
/// # Errors
///
/// Propagates renderer failures.
pub fn paint_service_time<R: Renderer>(
    renderer: &mut R,
    ctx: &KioskContext,
) -> Result<(), R::Error> {
    renderer.fill_rect(SERVICE_TIME_VALUE, ADMIN_BACKGROUND)?;
    let value = line(format_args!("{}s", ctx.timing.per_ticket_seconds()));
    centered_text(renderer, SERVICE_TIME_VALUE, &value, TextSize::Large, Rgb565::WHITE)
}

/// Redraws the whole of `state`.
///
/// # Errors
///
/// Propagates renderer failures.
pub fn paint<R: Renderer>(
    renderer: &mut R,
    state: ScreenState,
    ctx: &KioskContext,
    now: Millis,
) -> Result<(), R::Error> {
    renderer.fill_rect(FULL_SCREEN, background(state))?;
    let ink = foreground(state);

    match state {
        ScreenState::UserMain => {
            title(renderer, state, "WELCOME")?;
            paint_regions(renderer, state)?;
            paint_wait_time(renderer, ctx, now)?;
        }
        ScreenState::AdminLogin | ScreenState::PasswordChange => {
            let heading = if state == ScreenState::AdminLogin {
                "ADMIN LOGIN"
            } else {
                "NEW PASSWORD"
            };
            title(renderer, state, heading)?;
            paint_regions(renderer, state)?;
            paint_pin_entry(renderer, state, ctx)?;
        }
        ScreenState::AdminMain => {
            title(renderer, state, "ADMIN")?;
            paint_regions(renderer, state)?;
            let summary = line(format_args!(
                "{} waiting, {}s each",
                ctx.queue.len(),
                ctx.timing.per_ticket_seconds()
            ));
            let area = Rect::new(0, 280, SCREEN_WIDTH, 20);
            centered_text(renderer, area, &summary, TextSize::Normal, ink)?;
        }
        ScreenState::TicketIssued => {
            title(renderer, state, "YOUR TICKET")?;
            if let Some(issued) = ctx.issued {
                let number = line(format_args!("{}", issued.ticket));
                centered_text(renderer, Rect::new(0, 70, SCREEN_WIDTH, 40), &number, TextSize::Large, Rgb565::RED)?;
                let position = line(format_args!("Position: {}", issued.position));
                centered_text(renderer, Rect::new(0, 140, SCREEN_WIDTH, 20), &position, TextSize::Normal, ink)?;
                let wait = line(format_args!("Wait: {}", issued.wait));
                centered_text(renderer, Rect::new(0, 170, SCREEN_WIDTH, 20), &wait, TextSize::Normal, ink)?;
            }
            paint_regions(renderer, state)?;
        }
        ScreenState::QueueFull => {
            title(renderer, state, "QUEUE FULL")?;
            let capacity = line(format_args!("All {} places taken", ctx.queue.capacity()));
            centered_text(renderer, Rect::new(0, 120, SCREEN_WIDTH, 20), &capacity, TextSize::Normal, Rgb565::RED)?;
            centered_text(renderer, Rect::new(0, 150, SCREEN_WIDTH, 20), "Please try again later", TextSize::Normal, ink)?;
            paint_regions(renderer, state)?;
        }
        ScreenState::CallModal => {
            renderer.fill_rect(MODAL_BOX, Rgb565::LIGHT_GREY)?;
            renderer.draw_rect(MODAL_BOX, Rgb565::WHITE)?;
            let serving = match ctx.queue.front() {
                Some(ticket) => line(format_args!("Now serving {ticket}")),
                None => line(format_args!("No one waiting")),
            };
            let header = Rect::new(MODAL_BOX.x, MODAL_BOX.y + 20, MODAL_BOX.w, 30);
            centered_text(renderer, header, &serving, TextSize::Normal, Rgb565::BLACK)?;
            paint_regions(renderer, state)?;
        }
        ScreenState::QueueList => paint_queue_list(renderer, ctx)?,
        ScreenState::QueueDeleteConfirm => {
            renderer.fill_rect(DIALOG_BOX, Rgb565::LIGHT_GREY)?;
            renderer.draw_rect(DIALOG_BOX, Rgb565::WHITE)?;
            let prompt = match ctx.selection {
                Some(selection) => line(format_args!("Remove {}?", selection.ticket)),
                None => line(format_args!("Remove ticket?")),
            };
            let header = Rect::new(DIALOG_BOX.x, DIALOG_BOX.y + 36, DIALOG_BOX.w, 30);
            centered_text(renderer, header, &prompt, TextSize::Large, Rgb565::BLACK)?;
            paint_regions(renderer, state)?;
        }
        ScreenState::TimeSetting => {
            title(renderer, state, "SERVICE TIME")?;
            let hint = Rect::new(0, 70, SCREEN_WIDTH, 20);
            centered_text(renderer, hint, "Seconds per ticket", TextSize::Normal, ink)?;
            paint_regions(renderer, state)?;
            paint_service_time(renderer, ctx)?;
        }
    }

    Ok(())
}

fn paint_queue_list<R: Renderer>(renderer: &mut R, ctx: &KioskContext) -> Result<(), R::Error> {
    let state = ScreenState::QueueList;
    let heading = line(format_args!("QUEUE ({})", ctx.queue.len()));
    title(renderer, state, &heading)?;
    paint_regions(renderer, state)?;

    for (index, ticket) in ctx.queue.iter().take(QUEUE_SLOTS).enumerate() {
        if let Some(rect) = layout::queue_slot(index) {
            let label = line(format_args!("{}. {}", index + 1, ticket));
            button(renderer, rect, &label, Rgb565::DARK_GREY, Rgb565::WHITE)?;
        }
    }

    if ctx.queue.is_empty() {
        let area = Rect::new(0, 150, SCREEN_WIDTH, 20);
        centered_text(renderer, area, "Queue is empty", TextSize::Normal, Rgb565::WHITE)?;
    } else if ctx.queue.len() > QUEUE_SLOTS {
        let more = line(format_args!("+{} more", ctx.queue.len() - QUEUE_SLOTS));
        let area = Rect::new(0, 312, SCREEN_WIDTH, 8);
        centered_text(renderer, area, &more, TextSize::Normal, Rgb565::YELLOW)?;
    }
    Ok(())
}
