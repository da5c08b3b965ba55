//! Interaction state machines: rectangular zoom selection, the debounced
//! tooltip life cycle and the context menu. No ambient timers anywhere;
//! deadlines are `Instant`s the host polls through [`InteractionController::tick`].

use crate::core::{TooltipMode, Viewport};
use glam::DVec2;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

/// Selections thinner than this in either direction are discarded as
/// accidental drags.
pub const ZOOM_THRESHOLD_PX: f64 = 10.0;
/// Quiet time after the last movement before the tooltip fires.
pub const TOOLTIP_DEBOUNCE: Duration = Duration::from_millis(300);
/// Time a visible tooltip stays on screen without interaction.
pub const TOOLTIP_AUTO_HIDE: Duration = Duration::from_millis(3000);

/// What the host should do in response to an input event or a timer edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Invert the pixel rectangle through the scales and zoom to it.
    ZoomTo { pmin: DVec2, pmax: DVec2 },
    Unzoom { x: bool, y: bool },
    /// Collect tooltips at the pixel position and show the overlay.
    ShowTooltip { at: DVec2 },
    HideTooltip,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    Selecting { origin: DVec2, current: DVec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TooltipPhase {
    Idle,
    /// Timer armed; every further move pushes the deadline out.
    Armed { deadline: Instant, pos: DVec2 },
    Visible { hide_at: Instant },
}

/// Per-frame interaction controller. Only the first painter of an overlay
/// group owns one; siblings route their input through it.
#[derive(Clone, Debug)]
pub struct InteractionController {
    view: Viewport,
    mode: TooltipMode,
    drag: DragState,
    tooltip: TooltipPhase,
}

impl InteractionController {
    pub fn new(view: Viewport, mode: TooltipMode) -> Self {
        Self {
            view,
            mode,
            drag: DragState::Idle,
            tooltip: TooltipPhase::Idle,
        }
    }

    /// Begin a selection. A visible tooltip is closed immediately.
    pub fn pointer_down(&mut self, pos: DVec2) -> Vec<Effect> {
        let mut effects = Vec::new();
        if matches!(self.tooltip, TooltipPhase::Visible { .. }) {
            effects.push(Effect::HideTooltip);
        }
        self.tooltip = TooltipPhase::Idle;
        let (x, y) = self.view.clamp(pos.x, pos.y);
        let origin = DVec2::new(x, y);
        self.drag = DragState::Selecting {
            origin,
            current: origin,
        };
        effects
    }

    /// Track movement: grows the live selection while dragging, otherwise
    /// feeds the tooltip debounce.
    pub fn pointer_move(&mut self, pos: DVec2, now: Instant) {
        let (x, y) = self.view.clamp(pos.x, pos.y);
        let pos = DVec2::new(x, y);
        if let DragState::Selecting { current, .. } = &mut self.drag {
            *current = pos;
            return;
        }
        if self.mode != TooltipMode::Debounced {
            return;
        }
        match &mut self.tooltip {
            TooltipPhase::Visible { .. } => {}
            TooltipPhase::Idle => {
                self.tooltip = TooltipPhase::Armed {
                    deadline: now + TOOLTIP_DEBOUNCE,
                    pos,
                };
            }
            // Each move re-arms the quiet-period timer from `now`.
            TooltipPhase::Armed { deadline, pos: armed_pos } => {
                *deadline = now + TOOLTIP_DEBOUNCE;
                *armed_pos = pos;
            }
        }
    }

    /// Finish a selection. Too-thin rectangles are dropped; otherwise the
    /// ordered pixel corners come back for the host to invert and apply.
    pub fn pointer_up(&mut self, pos: DVec2) -> Option<Effect> {
        let DragState::Selecting { origin, .. } = self.drag else {
            return None;
        };
        self.drag = DragState::Idle;
        let (x, y) = self.view.clamp(pos.x, pos.y);
        if (x - origin.x).abs() < ZOOM_THRESHOLD_PX || (y - origin.y).abs() < ZOOM_THRESHOLD_PX {
            return None;
        }
        Some(Effect::ZoomTo {
            pmin: DVec2::new(origin.x.min(x), origin.y.min(y)),
            pmax: DVec2::new(origin.x.max(x), origin.y.max(y)),
        })
    }

    /// Leaving the frame cancels a pending tooltip.
    pub fn pointer_leave(&mut self) {
        if matches!(self.tooltip, TooltipPhase::Armed { .. }) {
            self.tooltip = TooltipPhase::Idle;
        }
    }

    pub fn double_click(&mut self) -> Effect {
        Effect::Unzoom { x: true, y: true }
    }

    /// Poll the timer edges. Once the pointer has rested for the full quiet
    /// period, the tooltip fires and the auto-hide countdown begins.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.tooltip {
            TooltipPhase::Armed { deadline, pos } if now >= deadline => {
                effects.push(Effect::ShowTooltip { at: pos });
                self.tooltip = TooltipPhase::Visible {
                    hide_at: now + TOOLTIP_AUTO_HIDE,
                };
            }
            TooltipPhase::Visible { hide_at } if now >= hide_at => {
                effects.push(Effect::HideTooltip);
                self.tooltip = TooltipPhase::Idle;
            }
            _ => {}
        }
        effects
    }

    /// Live selection rectangle as (origin, size), for the host to draw.
    pub fn selection_rect(&self) -> Option<(DVec2, DVec2)> {
        match self.drag {
            DragState::Selecting { origin, current } => Some((
                DVec2::new(origin.x.min(current.x), origin.y.min(current.y)),
                DVec2::new(
                    (current.x - origin.x).abs(),
                    (current.y - origin.y).abs(),
                ),
            )),
            DragState::Idle => None,
        }
    }

    /// Earliest pending deadline, so a host can sleep instead of polling.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.tooltip {
            TooltipPhase::Armed { deadline, .. } => Some(deadline),
            TooltipPhase::Visible { hide_at } => Some(hide_at),
            TooltipPhase::Idle => None,
        }
    }
}

/// One context menu entry: a label and the command token the host passes
/// back for execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub cmd: &'static str,
}

/// Context menu for a frame: unzoom entries always, stat toggle when there
/// is content, the 2-D extras when the painter draws a 2-D histogram.
pub fn context_menu(draw_content: bool, hist2d: bool, in_3d: bool) -> Vec<MenuItem> {
    let mut menu = vec![
        MenuItem { label: "Unzoom X", cmd: "unx" },
        MenuItem { label: "Unzoom Y", cmd: "uny" },
        MenuItem { label: "Unzoom", cmd: "unxy" },
    ];
    if draw_content {
        menu.push(MenuItem {
            label: "Toggle stat",
            cmd: "togstat",
        });
    }
    if hist2d {
        if in_3d {
            menu.push(MenuItem {
                label: "Draw in 2D",
                cmd: "draw2d",
            });
        } else {
            menu.push(MenuItem {
                label: "Draw in 3D",
                cmd: "draw3d",
            });
        }
        menu.push(MenuItem {
            label: "Toggle col",
            cmd: "col",
        });
    }
    menu
}

/// Stable hash over tooltip content, used to skip a redundant re-show when
/// the tip text did not change.
pub fn tip_hash(lines: &[String]) -> u64 {
    let mut hasher = DefaultHasher::new();
    lines.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctl() -> InteractionController {
        InteractionController::new(Viewport::new(400.0, 300.0), TooltipMode::Debounced)
    }

    #[test]
    fn thin_selection_is_discarded() {
        let mut c = ctl();
        c.pointer_down(DVec2::new(50.0, 50.0));
        assert!(c.pointer_up(DVec2::new(59.0, 200.0)).is_none());

        c.pointer_down(DVec2::new(50.0, 50.0));
        assert!(c.pointer_up(DVec2::new(200.0, 58.0)).is_none());
    }

    #[test]
    fn selection_produces_ordered_corners() {
        let mut c = ctl();
        c.pointer_down(DVec2::new(200.0, 250.0));
        let eff = c.pointer_up(DVec2::new(100.0, 100.0)).unwrap();
        assert_eq!(
            eff,
            Effect::ZoomTo {
                pmin: DVec2::new(100.0, 100.0),
                pmax: DVec2::new(200.0, 250.0),
            }
        );
    }

    #[test]
    fn selection_clamps_to_viewport() {
        let mut c = ctl();
        c.pointer_down(DVec2::new(-20.0, -20.0));
        let eff = c.pointer_up(DVec2::new(500.0, 500.0)).unwrap();
        assert_eq!(
            eff,
            Effect::ZoomTo {
                pmin: DVec2::ZERO,
                pmax: DVec2::new(400.0, 300.0),
            }
        );
    }

    #[test]
    fn drag_tracks_live_rectangle() {
        let mut c = ctl();
        let now = Instant::now();
        c.pointer_down(DVec2::new(10.0, 10.0));
        c.pointer_move(DVec2::new(60.0, 40.0), now);
        let (origin, size) = c.selection_rect().unwrap();
        assert_eq!(origin, DVec2::new(10.0, 10.0));
        assert_eq!(size, DVec2::new(50.0, 30.0));
        c.pointer_up(DVec2::new(60.0, 40.0));
        assert!(c.selection_rect().is_none());
    }

    #[test]
    fn tooltip_fires_after_quiet_period() {
        let mut c = ctl();
        let t0 = Instant::now();
        c.pointer_move(DVec2::new(100.0, 100.0), t0);
        assert!(c.tick(t0 + Duration::from_millis(100)).is_empty());
        let effects = c.tick(t0 + Duration::from_millis(301));
        assert_eq!(
            effects,
            vec![Effect::ShowTooltip {
                at: DVec2::new(100.0, 100.0)
            }]
        );
    }

    #[test]
    fn movement_restarts_the_debounce() {
        let mut c = ctl();
        let t0 = Instant::now();
        c.pointer_move(DVec2::new(100.0, 100.0), t0);
        c.pointer_move(DVec2::new(110.0, 100.0), t0 + Duration::from_millis(200));
        // The second move pushed the deadline past the original one.
        assert!(c.tick(t0 + Duration::from_millis(301)).is_empty());
        let effects = c.tick(t0 + Duration::from_millis(700));
        assert!(matches!(effects[0], Effect::ShowTooltip { .. }));
    }

    #[test]
    fn debounce_measures_from_the_last_motion() {
        let mut c = ctl();
        let t0 = Instant::now();
        c.pointer_move(DVec2::new(100.0, 100.0), t0);
        c.pointer_move(DVec2::new(120.0, 100.0), t0 + Duration::from_millis(200));
        // Quiet period counted from the last move: fires at 500 ms exactly,
        // not at the doubled first deadline.
        assert_eq!(
            c.next_deadline(),
            Some(t0 + Duration::from_millis(200) + TOOLTIP_DEBOUNCE)
        );
        assert!(c.tick(t0 + Duration::from_millis(499)).is_empty());
        let effects = c.tick(t0 + Duration::from_millis(500));
        assert_eq!(
            effects,
            vec![Effect::ShowTooltip {
                at: DVec2::new(120.0, 100.0)
            }]
        );
    }

    #[test]
    fn leaving_cancels_a_pending_tooltip() {
        let mut c = ctl();
        let t0 = Instant::now();
        c.pointer_move(DVec2::new(100.0, 100.0), t0);
        c.pointer_leave();
        assert!(c.tick(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn visible_tooltip_auto_hides() {
        let mut c = ctl();
        let t0 = Instant::now();
        c.pointer_move(DVec2::new(100.0, 100.0), t0);
        c.tick(t0 + Duration::from_millis(300));
        assert!(c.tick(t0 + Duration::from_millis(1000)).is_empty());
        let effects = c.tick(t0 + Duration::from_millis(3301));
        assert_eq!(effects, vec![Effect::HideTooltip]);
        // Afterwards the machine is idle again.
        assert!(c.next_deadline().is_none());
    }

    #[test]
    fn pointer_down_closes_visible_tooltip() {
        let mut c = ctl();
        let t0 = Instant::now();
        c.pointer_move(DVec2::new(100.0, 100.0), t0);
        c.tick(t0 + Duration::from_millis(300));
        let effects = c.pointer_down(DVec2::new(100.0, 100.0));
        assert_eq!(effects, vec![Effect::HideTooltip]);
    }

    #[test]
    fn tooltip_disabled_outside_debounced_mode() {
        let mut c = InteractionController::new(Viewport::new(400.0, 300.0), TooltipMode::Off);
        let t0 = Instant::now();
        c.pointer_move(DVec2::new(100.0, 100.0), t0);
        assert!(c.next_deadline().is_none());
    }

    #[test]
    fn double_click_requests_full_unzoom() {
        let mut c = ctl();
        assert_eq!(c.double_click(), Effect::Unzoom { x: true, y: true });
    }

    #[test]
    fn context_menu_composition() {
        let base = context_menu(false, false, false);
        assert_eq!(base.len(), 3);
        let with_stat = context_menu(true, false, false);
        assert!(with_stat.iter().any(|m| m.cmd == "togstat"));
        let h2 = context_menu(true, true, false);
        assert!(h2.iter().any(|m| m.cmd == "draw3d"));
        assert!(h2.iter().any(|m| m.cmd == "col"));
        let h2_3d = context_menu(true, true, true);
        assert!(h2_3d.iter().any(|m| m.cmd == "draw2d"));
    }

    #[test]
    fn tip_hash_tracks_content() {
        let a = vec!["histo: h1".to_owned(), "bin: 3".to_owned()];
        let b = vec!["histo: h1".to_owned(), "bin: 4".to_owned()];
        assert_eq!(tip_hash(&a), tip_hash(&a.clone()));
        assert_ne!(tip_hash(&a), tip_hash(&b));
    }
}
