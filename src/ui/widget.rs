use crate::{
    core::{bounds::Bounds, geo::Point, geo::TileAddress},
    input::{
        controller::InteractionState,
        events::{PointerEvent, ZoomDirection},
    },
    layers::marker::{MarkerKind, MarkerStatus},
    prelude::{HashMap, HashSet},
    rendering::{context::DrawCommand, renderer::MapRenderer},
};
use egui::{
    Align2, Color32, ColorImage, FontId, Painter, Pos2, Rect, Response, Sense, Stroke,
    TextureHandle, TextureOptions, Ui, Vec2, Widget,
};
use std::time::Duration;

/// Interval for re-checking the loader while tiles are in flight
const TILE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// egui textures of the tiles on screen, kept by the host between frames
#[derive(Default)]
pub struct TileTextures {
    textures: HashMap<TileAddress, TextureHandle>,
}

impl TileTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Immediate-mode egui view of a [`MapRenderer`]
///
/// ```rust,ignore
/// ui.add(fleetmap::ui::MapView::new(&mut renderer, &mut textures));
/// ```
pub struct MapView<'a> {
    renderer: &'a mut MapRenderer,
    textures: &'a mut TileTextures,
    size: Option<Vec2>,
}

impl<'a> MapView<'a> {
    pub fn new(renderer: &'a mut MapRenderer, textures: &'a mut TileTextures) -> Self {
        Self {
            renderer,
            textures,
            size: None,
        }
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    /// Translates this frame's egui pointer state into map pointer events
    fn forward_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let (pos, pressed, released, down) = ui.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
            )
        });
        let Some(pos) = pos else {
            return;
        };

        let position = to_local(rect, pos);
        let dragging = matches!(
            self.renderer.interaction(),
            InteractionState::Dragging { .. }
        );

        let event = if pressed && response.hovered() {
            Some(PointerEvent::Down { position })
        } else if dragging && !rect.contains(pos) {
            Some(PointerEvent::Leave { position })
        } else if released {
            Some(PointerEvent::Up { position })
        } else if down && dragging {
            Some(PointerEvent::Move { position })
        } else {
            None
        };

        if let Some(event) = event {
            self.renderer.handle_pointer(event);
        }
    }

    fn paint(&mut self, ui: &Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_gray(230));

        let ctx = ui.ctx().clone();
        let scene = self.renderer.render();
        let mut on_screen = HashSet::default();

        for command in &scene.commands {
            match command {
                DrawCommand::Tile {
                    address,
                    rect: tile_rect,
                    image,
                    ..
                } => {
                    on_screen.insert(*address);
                    let texture = self.textures.textures.entry(*address).or_insert_with(|| {
                        let pixels = ColorImage::from_rgba_unmultiplied(
                            [image.width as usize, image.height as usize],
                            &image.rgba,
                        );
                        ctx.load_texture(format!("tile_{}", address), pixels, TextureOptions::LINEAR)
                    });
                    painter.image(
                        texture.id(),
                        to_screen(rect, tile_rect),
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
                DrawCommand::Placeholder {
                    rect: tile_rect,
                    failed,
                    ..
                } => {
                    let fill = if *failed {
                        Color32::from_gray(200)
                    } else {
                        Color32::from_gray(220)
                    };
                    let tile_rect = to_screen(rect, tile_rect);
                    painter.rect_filled(tile_rect, 0.0, fill);
                    painter.rect_stroke(tile_rect, 0.0, Stroke::new(0.5, Color32::from_gray(190)));
                }
                DrawCommand::Marker {
                    kind,
                    status,
                    label,
                    position,
                    radius,
                    selected,
                    ..
                } => {
                    let center = rect.min + Vec2::new(position.x as f32, position.y as f32);
                    let radius = *radius as f32;
                    painter.circle_filled(center, radius, marker_color(*kind, *status));
                    let stroke = if *selected {
                        Stroke::new(3.0, Color32::from_rgb(255, 215, 0))
                    } else {
                        Stroke::new(2.0, Color32::WHITE)
                    };
                    painter.circle_stroke(center, radius, stroke);

                    if let Some(label) = label {
                        painter.text(
                            center + Vec2::new(0.0, radius + 2.0),
                            Align2::CENTER_TOP,
                            label,
                            FontId::proportional(11.0),
                            Color32::from_gray(40),
                        );
                    }
                }
                DrawCommand::ZoomButton {
                    direction,
                    rect: button_rect,
                    enabled,
                } => paint_zoom_button(&painter, to_screen(rect, button_rect), *direction, *enabled),
            }
        }

        self.textures
            .textures
            .retain(|address, _| on_screen.contains(address));
    }
}

impl Widget for MapView<'_> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = self.size.unwrap_or_else(|| ui.available_size());
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        self.renderer
            .resize(rect.width() as f64, rect.height() as f64);
        self.forward_input(ui, rect, &response);
        self.paint(ui, rect);

        if self.renderer.needs_render() {
            ui.ctx().request_repaint();
        } else if self.renderer.tile_store().pending_count() > 0 {
            ui.ctx().request_repaint_after(TILE_POLL_INTERVAL);
        }

        response
    }
}

fn to_local(rect: Rect, pos: Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn to_screen(rect: Rect, bounds: &Bounds) -> Rect {
    Rect::from_min_max(
        rect.min + Vec2::new(bounds.min.x as f32, bounds.min.y as f32),
        rect.min + Vec2::new(bounds.max.x as f32, bounds.max.y as f32),
    )
}

fn marker_color(kind: MarkerKind, status: Option<MarkerStatus>) -> Color32 {
    match status {
        Some(MarkerStatus::Online) => Color32::from_rgb(34, 197, 94),
        Some(MarkerStatus::Offline) => Color32::from_rgb(148, 163, 184),
        Some(MarkerStatus::Error) => Color32::from_rgb(239, 68, 68),
        Some(MarkerStatus::Warning) => Color32::from_rgb(245, 158, 11),
        None => match kind {
            MarkerKind::Device | MarkerKind::Plain => Color32::from_rgb(59, 130, 246),
            MarkerKind::Metric => Color32::from_rgb(168, 85, 247),
            MarkerKind::Command => Color32::from_rgb(249, 115, 22),
        },
    }
}

fn paint_zoom_button(painter: &Painter, rect: Rect, direction: ZoomDirection, enabled: bool) {
    painter.rect_filled(rect, 3.0, Color32::from_rgba_unmultiplied(255, 255, 255, 220));
    painter.rect_stroke(rect, 3.0, Stroke::new(1.0, Color32::from_gray(100)));

    let glyph = match direction {
        ZoomDirection::In => "+",
        ZoomDirection::Out => "−",
    };
    let color = if enabled {
        Color32::BLACK
    } else {
        Color32::from_gray(170)
    };
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        glyph,
        FontId::proportional(16.0),
        color,
    );
}
