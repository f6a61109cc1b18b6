use super::layout::{self, Control, Region};
use super::{Effect, Input, KioskContext, ScreenState, Selection, Step};
use crate::clock::Millis;
use crate::queue::QueueError;
use crate::screen::IssuedTicket;
use crate::telemetry::{KioskEvent, ServeReason};

/// Advances the screen machine by one input.
pub fn step(state: ScreenState, ctx: &mut KioskContext, input: Input, now: Millis) -> Step {
    match input {
        Input::Touch(point) => match layout::hit_test(state, point, ctx.queue.len()) {
            Some(hit) => on_press(state, ctx, hit, now),
            None => Step::stay(state),
        },
        Input::Tick => on_tick(state, ctx, now),
    }
}

fn on_press(state: ScreenState, ctx: &mut KioskContext, hit: Region, now: Millis) -> Step {
    let stay = Step::stay(state);
    let flash = Effect::Flash(hit);

    match (state, hit.control) {
        (ScreenState::UserMain, Control::AdminIcon) => {
            ctx.admin.entered.clear();
            stay.goto(ScreenState::AdminLogin)
        }
        (ScreenState::UserMain, Control::JoinQueue) => join_queue(ctx, now),

        (ScreenState::AdminLogin, Control::Back) => stay.goto(ScreenState::UserMain),
        (ScreenState::AdminLogin, Control::Enter) => match ctx.admin.verify() {
            Ok(()) => stay
                .goto(ScreenState::AdminMain)
                .with(Effect::Record(KioskEvent::LoginAccepted)),
            Err(_) => stay
                .with(Effect::RefreshPinEntry)
                .with(flash)
                .with(Effect::Record(KioskEvent::LoginRejected)),
        },
        (ScreenState::AdminLogin, control) => {
            if edit_pin(&mut ctx.admin.entered, control) {
                stay.with(Effect::RefreshPinEntry).with(flash)
            } else {
                stay.with(flash)
            }
        }

        (ScreenState::AdminMain, Control::Back) => stay.goto(ScreenState::UserMain),
        (ScreenState::AdminMain, Control::ViewQueue) => stay.goto(ScreenState::QueueList),
        (ScreenState::AdminMain, Control::TimeSetting) => stay.goto(ScreenState::TimeSetting),
        (ScreenState::AdminMain, Control::ChangePassword) => {
            ctx.admin.new.clear();
            stay.goto(ScreenState::PasswordChange)
        }

        (ScreenState::TicketIssued | ScreenState::QueueFull, Control::Confirm) => {
            stay.goto(ScreenState::UserMain)
        }

        (ScreenState::CallModal, Control::Close) => stay.goto(ScreenState::AdminMain),

        (ScreenState::QueueList, Control::Close) => stay.goto(ScreenState::AdminMain),
        (ScreenState::QueueList, Control::QueueSlot(slot)) => {
            let index = usize::from(slot);
            match ctx.queue.get(index) {
                Some(ticket) => {
                    ctx.selection = Some(Selection { index, ticket });
                    stay.goto(ScreenState::QueueDeleteConfirm)
                }
                None => stay,
            }
        }

        (ScreenState::QueueDeleteConfirm, Control::Close | Control::No) => {
            ctx.selection = None;
            stay.goto(ScreenState::QueueList)
        }
        (ScreenState::QueueDeleteConfirm, Control::Yes) => {
            let mut step = stay.goto(ScreenState::QueueList);
            if let Some(selection) = ctx.selection.take()
                && let Some(index) = ctx.queue.position_of(selection.ticket)
                && let Ok(ticket) = ctx.queue.dequeue_at(index)
            {
                step.push(Effect::Record(KioskEvent::TicketServed {
                    ticket,
                    reason: ServeReason::Admin,
                }));
            }
            step
        }

        (ScreenState::TimeSetting, Control::Increment | Control::Decrement) => {
            let changed = if hit.control == Control::Increment {
                ctx.timing.increment()
            } else {
                ctx.timing.decrement()
            };
            if changed {
                stay.with(Effect::RefreshServiceTime)
                    .with(flash)
                    .with(Effect::Record(KioskEvent::ServiceTimeChanged {
                        seconds: ctx.timing.per_ticket_seconds(),
                    }))
            } else {
                stay.with(flash)
            }
        }
        (ScreenState::TimeSetting, Control::Confirm) => stay.goto(ScreenState::AdminMain),

        (ScreenState::PasswordChange, Control::Back) => stay.goto(ScreenState::AdminMain),
        (ScreenState::PasswordChange, Control::Enter) => {
            if ctx.admin.commit_new() {
                stay.goto(ScreenState::AdminMain)
                    .with(Effect::Record(KioskEvent::PasswordChanged))
            } else {
                stay.with(flash)
            }
        }
        (ScreenState::PasswordChange, control) => {
            if edit_pin(&mut ctx.admin.new, control) {
                stay.with(Effect::RefreshPinEntry).with(flash)
            } else {
                stay.with(flash)
            }
        }

        _ => stay,
    }
}

fn join_queue(ctx: &mut KioskContext, now: Millis) -> Step {
    let stay = Step::stay(ScreenState::UserMain);
    let was_empty = ctx.queue.is_empty();
    let ticket = ctx.dispenser.peek();
    ctx.clocks.ticket_issue_time = now;

    match ctx.queue.enqueue(ticket) {
        Ok(()) => {
            ctx.dispenser.advance();
            if was_empty {
                ctx.clocks.last_process_time = now;
            }
            let position = ctx.queue.position_of(ticket).map_or(ctx.queue.len(), |i| i + 1);
            let wait = ctx.current_wait(now);
            ctx.issued = Some(IssuedTicket {
                ticket,
                position,
                wait,
            });
            stay.goto(ScreenState::TicketIssued)
                .with(Effect::Record(KioskEvent::TicketIssued {
                    ticket,
                    position,
                    wait,
                }))
        }
        Err(QueueError::Full { capacity }) => stay
            .goto(ScreenState::QueueFull)
            .with(Effect::Record(KioskEvent::QueueFull { capacity })),
        Err(QueueError::IndexOutOfRange { .. }) => stay,
    }
}

/// Applies a keypad-screen edit. Returns `true` when the buffer changed.
fn edit_pin(entry: &mut super::PinEntry, control: Control) -> bool {
    match control {
        Control::Key(_) => control.key_char().is_some_and(|c| entry.push(c)),
        Control::Clear => {
            let changed = !entry.is_empty();
            entry.clear();
            changed
        }
        Control::Delete => entry.pop().is_some(),
        _ => false,
    }
}

fn on_tick(state: ScreenState, ctx: &mut KioskContext, now: Millis) -> Step {
    let mut step = Step::stay(state);

    if state == ScreenState::UserMain
        && !ctx.queue.is_empty()
        && now.has_elapsed(ctx.clocks.last_wait_display_update, ctx.wait_refresh)
    {
        ctx.clocks.last_wait_display_update = now;
        step.push(Effect::RefreshWaitTime);
    }

    if state.auto_reverts() && now.has_elapsed(ctx.clocks.ticket_issue_time, ctx.revert_after) {
        step = step.goto(ScreenState::UserMain);
    }

    if let Some(front) = ctx.queue.front()
        && now.has_elapsed(ctx.clocks.last_process_time, ctx.timing.per_ticket())
        && ctx.queue.dequeue_at(0).is_ok()
    {
        ctx.clocks.last_process_time = now;
        step.push(Effect::Record(KioskEvent::TicketServed {
            ticket: front,
            reason: ServeReason::Timer,
        }));
        if step.next.shows_queue() {
            step.push(Effect::Repaint);
        }
    }

    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::Ticket;
    use crate::timing;
    use crate::touch::ScreenPoint;

    fn press(state: ScreenState, ctx: &mut KioskContext, point: ScreenPoint, now: u32) -> Step {
        step(state, ctx, Input::Touch(point), Millis::new(now))
    }

    fn key(digit: u8) -> ScreenPoint {
        layout::KEYPAD[usize::from(digit)].rect.center()
    }

    fn fixed(state: ScreenState, control: Control) -> ScreenPoint {
        layout::region_of(state, control)
            .expect("control on screen")
            .rect
            .center()
    }

    #[test]
    fn touch_outside_regions_is_ignored() {
        let mut ctx = KioskContext::default();
        let result = press(ScreenState::UserMain, &mut ctx, ScreenPoint::new(120, 5), 0);
        assert_eq!(result, Step::stay(ScreenState::UserMain));
    }

    #[test]
    fn join_issues_ticket_and_snapshots_wait() {
        let mut ctx = KioskContext::default();
        let join = fixed(ScreenState::UserMain, Control::JoinQueue);

        let first = press(ScreenState::UserMain, &mut ctx, join, 1_000);
        assert_eq!(first.next, ScreenState::TicketIssued);
        assert_eq!(ctx.clocks.last_process_time, Millis::new(1_000));

        let second = press(ScreenState::UserMain, &mut ctx, join, 21_000);
        assert_eq!(second.next, ScreenState::TicketIssued);
        let issued = ctx.issued.expect("snapshot recorded");
        assert_eq!(issued.ticket, Ticket::new(2));
        assert_eq!(issued.position, 2);
        // 40 s left on the first ticket plus one full period.
        assert_eq!(issued.wait.as_secs(), 100);
        assert_eq!(ctx.clocks.ticket_issue_time, Millis::new(21_000));
    }

    #[test]
    fn full_queue_shows_queue_full_without_issuing() {
        let mut ctx = KioskContext::default();
        for number in 1..=20 {
            ctx.queue.enqueue(Ticket::new(number)).expect("room");
        }
        let join = fixed(ScreenState::UserMain, Control::JoinQueue);
        let result = press(ScreenState::UserMain, &mut ctx, join, 500);
        assert_eq!(result.next, ScreenState::QueueFull);
        assert_eq!(ctx.dispenser.issued(), 0);
        assert_eq!(ctx.clocks.ticket_issue_time, Millis::new(500));
        assert!(
            result
                .events()
                .any(|event| event == KioskEvent::QueueFull { capacity: 20 })
        );
    }

    #[test]
    fn admin_icon_clears_stale_entry() {
        let mut ctx = KioskContext::default();
        ctx.admin.entered.push('9');
        let icon = fixed(ScreenState::UserMain, Control::AdminIcon);
        let result = press(ScreenState::UserMain, &mut ctx, icon, 0);
        assert_eq!(result.next, ScreenState::AdminLogin);
        assert!(ctx.admin.entered.is_empty());
    }

    #[test]
    fn keypad_edits_flash_and_refresh() {
        let mut ctx = KioskContext::default();
        let result = press(ScreenState::AdminLogin, &mut ctx, key(7), 0);
        assert_eq!(result.next, ScreenState::AdminLogin);
        assert!(result.effects.contains(&Effect::RefreshPinEntry));
        assert!(
            result
                .effects
                .iter()
                .any(|effect| matches!(effect, Effect::Flash(region) if region.control == Control::Key(7)))
        );

        let delete = fixed(ScreenState::AdminLogin, Control::Delete);
        press(ScreenState::AdminLogin, &mut ctx, delete, 0);
        assert!(ctx.admin.entered.is_empty());
    }

    #[test]
    fn queue_list_slot_selects_ticket() {
        let mut ctx = KioskContext::default();
        for number in [5, 6, 7] {
            ctx.queue.enqueue(Ticket::new(number)).expect("room");
        }
        let slot = layout::queue_slot(1).expect("slot").center();
        let result = press(ScreenState::QueueList, &mut ctx, slot, 0);
        assert_eq!(result.next, ScreenState::QueueDeleteConfirm);
        assert_eq!(
            ctx.selection,
            Some(Selection {
                index: 1,
                ticket: Ticket::new(6)
            })
        );

        let yes = fixed(ScreenState::QueueDeleteConfirm, Control::Yes);
        let result = press(ScreenState::QueueDeleteConfirm, &mut ctx, yes, 0);
        assert_eq!(result.next, ScreenState::QueueList);
        assert_eq!(ctx.queue.as_slice(), &[Ticket::new(5), Ticket::new(7)]);
        assert_eq!(ctx.selection, None);
    }

    #[test]
    fn delete_confirm_tracks_ticket_not_slot() {
        let mut ctx = KioskContext::default();
        for number in [5, 6, 7] {
            ctx.queue.enqueue(Ticket::new(number)).expect("room");
        }
        ctx.selection = Some(Selection {
            index: 1,
            ticket: Ticket::new(6),
        });
        // Front ticket served while the dialog was open.
        ctx.queue.dequeue_at(0).expect("front");

        let yes = fixed(ScreenState::QueueDeleteConfirm, Control::Yes);
        press(ScreenState::QueueDeleteConfirm, &mut ctx, yes, 0);
        assert_eq!(ctx.queue.as_slice(), &[Ticket::new(7)]);
    }

    #[test]
    fn delete_confirm_no_discards_selection() {
        let mut ctx = KioskContext::default();
        ctx.queue.enqueue(Ticket::new(1)).expect("room");
        ctx.selection = Some(Selection {
            index: 0,
            ticket: Ticket::new(1),
        });
        let no = fixed(ScreenState::QueueDeleteConfirm, Control::No);
        let result = press(ScreenState::QueueDeleteConfirm, &mut ctx, no, 0);
        assert_eq!(result.next, ScreenState::QueueList);
        assert_eq!(ctx.selection, None);
        assert_eq!(ctx.queue.len(), 1);
    }

    #[test]
    fn service_time_buttons_clamp() {
        let mut ctx = KioskContext::default();
        ctx.timing = timing::TimingConfig::new(99);
        let plus = fixed(ScreenState::TimeSetting, Control::Increment);
        let result = press(ScreenState::TimeSetting, &mut ctx, plus, 0);
        assert_eq!(ctx.timing.per_ticket_seconds(), 99);
        assert!(!result.effects.contains(&Effect::RefreshServiceTime));

        let minus = fixed(ScreenState::TimeSetting, Control::Decrement);
        let result = press(ScreenState::TimeSetting, &mut ctx, minus, 0);
        assert_eq!(ctx.timing.per_ticket_seconds(), 98);
        assert!(result.effects.contains(&Effect::RefreshServiceTime));
    }

    #[test]
    fn password_change_commits_four_characters() {
        let mut ctx = KioskContext::default();
        let enter = fixed(ScreenState::PasswordChange, Control::Enter);
        for digit in [10, 11, 12] {
            press(ScreenState::PasswordChange, &mut ctx, key(digit), 0);
        }
        let early = press(ScreenState::PasswordChange, &mut ctx, enter, 0);
        assert_eq!(early.next, ScreenState::PasswordChange);

        press(ScreenState::PasswordChange, &mut ctx, key(13), 0);
        let done = press(ScreenState::PasswordChange, &mut ctx, enter, 0);
        assert_eq!(done.next, ScreenState::AdminMain);
        assert_eq!(ctx.admin.password(), "ABCD");
    }

    #[test]
    fn call_modal_closes_to_admin_main() {
        let mut ctx = KioskContext::default();
        let close = fixed(ScreenState::CallModal, Control::Close);
        let result = press(ScreenState::CallModal, &mut ctx, close, 0);
        assert_eq!(result.next, ScreenState::AdminMain);
    }

    #[test]
    fn wait_line_refreshes_once_per_second() {
        let mut ctx = KioskContext::default();
        ctx.queue.enqueue(Ticket::new(1)).expect("room");

        let early = step(ScreenState::UserMain, &mut ctx, Input::Tick, Millis::new(999));
        assert!(!early.effects.contains(&Effect::RefreshWaitTime));
        let due = step(ScreenState::UserMain, &mut ctx, Input::Tick, Millis::new(1_000));
        assert!(due.effects.contains(&Effect::RefreshWaitTime));
        let again = step(ScreenState::UserMain, &mut ctx, Input::Tick, Millis::new(1_500));
        assert!(!again.effects.contains(&Effect::RefreshWaitTime));
    }

    #[test]
    fn empty_queue_skips_wait_refresh() {
        let mut ctx = KioskContext::default();
        let result = step(ScreenState::UserMain, &mut ctx, Input::Tick, Millis::new(5_000));
        assert!(result.effects.is_empty());
    }

    #[test]
    fn auto_dequeue_repaints_queue_list() {
        let mut ctx = KioskContext::default();
        ctx.timing = timing::TimingConfig::new(5);
        ctx.queue.enqueue(Ticket::new(1)).expect("room");
        let result = step(ScreenState::QueueList, &mut ctx, Input::Tick, Millis::new(5_000));
        assert!(result.repaints());
        assert!(ctx.queue.is_empty());
    }

    #[test]
    fn auto_dequeue_on_admin_main_does_not_repaint() {
        let mut ctx = KioskContext::default();
        ctx.timing = timing::TimingConfig::new(5);
        ctx.queue.enqueue(Ticket::new(1)).expect("room");
        let result = step(ScreenState::AdminMain, &mut ctx, Input::Tick, Millis::new(5_000));
        assert!(!result.repaints());
        assert!(ctx.queue.is_empty());
    }
}
