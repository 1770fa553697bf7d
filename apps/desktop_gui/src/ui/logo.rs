//! The decorative "42" badge: docked in the header until the pointer follower
//! takes it over, then drawn as a free-floating overlay.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use client_core::{FollowSurface, Placeable};
use eframe::egui;
use shared::domain::{ScreenPoint, ScreenRect};

pub const LOGO_SIZE: f32 = 64.0;

#[derive(Debug, Default)]
struct LogoPlacement {
    last_rect: Option<egui::Rect>,
    mount_offset: egui::Vec2,
    floating_at: Option<egui::Pos2>,
}

#[derive(Clone)]
pub struct LogoHandle {
    placement: Arc<Mutex<LogoPlacement>>,
    ctx: egui::Context,
}

impl LogoHandle {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            placement: Arc::new(Mutex::new(LogoPlacement::default())),
            ctx,
        }
    }

    fn placement(&self) -> MutexGuard<'_, LogoPlacement> {
        self.placement.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mount_offset(&self) -> egui::Vec2 {
        self.placement().mount_offset
    }

    pub fn floating_at(&self) -> Option<egui::Pos2> {
        self.placement().floating_at
    }

    /// Records where the badge was painted this frame.
    pub fn record_rect(&self, rect: egui::Rect) {
        self.placement().last_rect = Some(rect);
    }

    /// Draws the badge, docked in `ui` or floating above everything.
    pub fn show(&self, ui: &mut egui::Ui) {
        let size = egui::vec2(LOGO_SIZE, LOGO_SIZE);
        match self.floating_at() {
            Some(pos) => {
                // Keep the docked slot so the header does not collapse.
                ui.allocate_space(size);
                egui::Area::new(egui::Id::new("follow_logo"))
                    .order(egui::Order::Foreground)
                    .fixed_pos(pos)
                    .interactable(false)
                    .show(ui.ctx(), |ui| {
                        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                        paint_badge(ui, rect);
                        self.record_rect(rect);
                    });
            }
            None => {
                let (slot, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                let rect = slot.translate(self.mount_offset());
                paint_badge(ui, rect);
                self.record_rect(rect);
            }
        }
    }
}

fn paint_badge(ui: &egui::Ui, rect: egui::Rect) {
    let painter = ui.ctx().layer_painter(ui.layer_id());
    let accent = ui.visuals().selection.bg_fill;
    painter.circle_filled(rect.center(), rect.width() / 2.0, accent);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "42",
        egui::FontId::proportional(LOGO_SIZE * 0.45),
        ui.visuals().strong_text_color(),
    );
}

impl FollowSurface for LogoHandle {
    fn bounds(&self) -> Option<ScreenRect> {
        self.placement().last_rect.map(|rect| {
            ScreenRect::new(
                ScreenPoint::new(rect.min.x, rect.min.y),
                rect.width(),
                rect.height(),
            )
        })
    }

    fn detach_from_layout(&self) {
        let mut placement = self.placement();
        placement.floating_at = placement.last_rect.map(|rect| rect.min);
    }

    fn move_to(&self, position: ScreenPoint) {
        self.placement().floating_at = Some(egui::pos2(position.x, position.y));
        self.ctx.request_repaint();
    }
}

impl Placeable for LogoHandle {
    fn apply_offset(&self, offset: ScreenPoint) {
        self.placement().mount_offset = egui::vec2(offset.x, offset.y);
        self.ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_no_bounds_until_painted() {
        let logo = LogoHandle::new(egui::Context::default());
        assert!(logo.bounds().is_none());

        logo.record_rect(egui::Rect::from_min_size(
            egui::pos2(50.0, 10.0),
            egui::vec2(LOGO_SIZE, LOGO_SIZE),
        ));
        let bounds = logo.bounds().expect("bounds");
        assert_eq!(bounds.origin, ScreenPoint::new(50.0, 10.0));
        assert_eq!(bounds.width, LOGO_SIZE);
    }

    #[test]
    fn detaching_floats_at_current_position_then_follows_moves() {
        let logo = LogoHandle::new(egui::Context::default());
        logo.record_rect(egui::Rect::from_min_size(
            egui::pos2(50.0, 10.0),
            egui::vec2(LOGO_SIZE, LOGO_SIZE),
        ));

        logo.detach_from_layout();
        assert_eq!(logo.floating_at(), Some(egui::pos2(50.0, 10.0)));

        logo.move_to(ScreenPoint::new(120.0, 80.0));
        assert_eq!(logo.floating_at(), Some(egui::pos2(120.0, 80.0)));
    }

    #[test]
    fn mount_offset_only_shifts_docked_badge() {
        let logo = LogoHandle::new(egui::Context::default());
        assert_eq!(logo.mount_offset(), egui::Vec2::ZERO);

        logo.apply_offset(ScreenPoint::new(35.0, -40.0));

        assert_eq!(logo.mount_offset(), egui::vec2(35.0, -40.0));
        assert!(logo.floating_at().is_none());
    }
}
