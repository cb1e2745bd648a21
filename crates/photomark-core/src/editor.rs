//! Interaction controller: pointer events in, finalized strokes out.

use crate::camera::Camera;
use crate::input::{PointerButton, PointerEvent};
use crate::strokes::{
    Arrow, Circle, Freehand, Line, PathPoint, Stroke, StrokeStyle, Text,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    #[default]
    Freehand,
    Arrow,
    Line,
    Circle,
    Text,
}

/// State of the pointer interaction.
#[derive(Debug, Clone, Default)]
enum EditorState {
    /// Waiting for input.
    #[default]
    Idle,
    /// A stroke is in progress.
    Drawing {
        /// First logical point of the interaction.
        start: Point,
        /// Latest logical point of the interaction.
        current: Point,
        /// Accumulated logical points (freehand only grows past the first).
        points: Vec<PathPoint>,
    },
    /// The view is being dragged.
    Panning {
        /// Screen position at the previous event, for per-event deltas.
        last_screen: Point,
    },
}

/// Two-finger pinch tracking, independent of the single-pointer states.
#[derive(Debug, Clone)]
struct PinchState {
    /// Inter-touch distance at the previous pinch frame.
    last_distance: f64,
}

/// What the caller should do after feeding an event to the editor.
#[derive(Debug, Clone)]
pub enum EditorOutput {
    /// Nothing changed.
    Ignored,
    /// The live preview needs a redraw.
    Redraw,
    /// A stroke was finalized; append it to the committed list and save.
    Completed(Stroke),
    /// The text tool needs a text value; answer with `commit_text` or
    /// `cancel_text`.
    TextPending,
}

/// The annotation editor.
///
/// Owns the camera and the in-progress interaction state; committed strokes
/// belong to the caller, which receives them through
/// [`EditorOutput::Completed`].
#[derive(Debug)]
pub struct Editor {
    /// View transform for the editing surface.
    pub camera: Camera,
    tool: Tool,
    style: StrokeStyle,
    font_size: f64,
    pan_mode: bool,
    surface_origin: Point,
    state: EditorState,
    pinch: Option<PinchState>,
    pending_text: Option<Point>,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            camera: Camera::new(),
            tool: Tool::default(),
            style: StrokeStyle::default(),
            font_size: Text::DEFAULT_FONT_SIZE,
            pan_mode: false,
            surface_origin: Point::ZERO,
            state: EditorState::Idle,
            pinch: None,
            pending_text: None,
        }
    }
}

impl Editor {
    /// Create a new editor at the identity view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Cancels any interaction in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.state = EditorState::Idle;
        self.pending_text = None;
    }

    /// Get the current tool.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Set the style applied to new strokes.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    /// Get the style applied to new strokes.
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Set the font size for new text labels.
    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    /// Toggle pan mode (primary button pans instead of drawing).
    pub fn set_pan_mode(&mut self, enabled: bool) {
        self.pan_mode = enabled;
    }

    /// Whether pan mode is active.
    pub fn pan_mode(&self) -> bool {
        self.pan_mode
    }

    /// Set the drawing surface's origin in screen coordinates.
    pub fn set_surface_origin(&mut self, origin: Point) {
        self.surface_origin = origin;
    }

    /// Whether a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, EditorState::Drawing { .. })
    }

    /// Whether the view is being dragged.
    pub fn is_panning(&self) -> bool {
        matches!(self.state, EditorState::Panning { .. })
    }

    /// Whether a pinch gesture is in progress.
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Convert a window-space pointer position to logical image coordinates.
    pub fn to_image(&self, screen: Point) -> Point {
        self.camera.screen_to_image(Point::new(
            screen.x - self.surface_origin.x,
            screen.y - self.surface_origin.y,
        ))
    }

    /// Process one pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> EditorOutput {
        match event {
            PointerEvent::Down {
                position,
                button,
                pressure,
            } => self.pointer_down(position, button, pressure),
            PointerEvent::Move { position, pressure } => self.pointer_move(position, pressure),
            PointerEvent::Up { position, .. } => self.pointer_up(position),
        }
    }

    fn pointer_down(
        &mut self,
        position: Point,
        button: PointerButton,
        pressure: Option<f64>,
    ) -> EditorOutput {
        if self.pinch.is_some() {
            log::debug!("pointer down ignored during pinch gesture");
            return EditorOutput::Ignored;
        }
        if !matches!(self.state, EditorState::Idle) {
            return EditorOutput::Ignored;
        }

        if self.pan_mode || button.is_pan_trigger() {
            self.state = EditorState::Panning {
                last_screen: position,
            };
            return EditorOutput::Ignored;
        }

        let start = self.to_image(position);
        self.state = EditorState::Drawing {
            start,
            current: start,
            points: vec![PathPoint {
                pos: start,
                pressure,
            }],
        };
        EditorOutput::Redraw
    }

    fn pointer_move(&mut self, position: Point, pressure: Option<f64>) -> EditorOutput {
        let logical = self.to_image(position);
        match &mut self.state {
            EditorState::Drawing {
                current, points, ..
            } => {
                *current = logical;
                if self.tool == Tool::Freehand {
                    points.push(PathPoint {
                        pos: logical,
                        pressure,
                    });
                }
                EditorOutput::Redraw
            }
            EditorState::Panning { last_screen } => {
                // Per-event delta, not cumulative from the drag start.
                let delta = position - *last_screen;
                *last_screen = position;
                self.camera.pan(delta);
                EditorOutput::Redraw
            }
            EditorState::Idle => EditorOutput::Ignored,
        }
    }

    fn pointer_up(&mut self, position: Point) -> EditorOutput {
        match std::mem::take(&mut self.state) {
            EditorState::Drawing { start, points, .. } => {
                let end = self.to_image(position);
                self.finish_stroke(start, end, points)
            }
            EditorState::Panning { .. } => EditorOutput::Ignored,
            EditorState::Idle => EditorOutput::Ignored,
        }
    }

    fn finish_stroke(
        &mut self,
        start: Point,
        end: Point,
        points: Vec<PathPoint>,
    ) -> EditorOutput {
        match self.tool {
            Tool::Freehand => {
                if points.len() < 2 {
                    log::debug!("discarding freehand stroke with {} point(s)", points.len());
                    return EditorOutput::Ignored;
                }
                let mut freehand = Freehand::from_points(points, self.style);
                freehand.finalize();
                EditorOutput::Completed(Stroke::Freehand(freehand))
            }
            Tool::Arrow => {
                EditorOutput::Completed(Stroke::Arrow(Arrow::new(start, end, self.style)))
            }
            Tool::Line => EditorOutput::Completed(Stroke::Line(Line::new(start, end, self.style))),
            Tool::Circle => {
                EditorOutput::Completed(Stroke::Circle(Circle::new(start, end, self.style)))
            }
            Tool::Text => {
                self.pending_text = Some(start);
                EditorOutput::TextPending
            }
        }
    }

    /// Answer a [`EditorOutput::TextPending`] with the entered text.
    ///
    /// Empty (or whitespace-only) input aborts the stroke with no side
    /// effects, matching a cancelled prompt.
    pub fn commit_text(&mut self, content: &str) -> Option<Stroke> {
        let position = self.pending_text.take()?;
        if content.trim().is_empty() {
            log::debug!("empty text input, aborting text stroke");
            return None;
        }
        let text = Text::new(position, content.to_string(), self.style)
            .with_font_size(self.font_size);
        Some(Stroke::Text(text))
    }

    /// Abort a pending text prompt.
    pub fn cancel_text(&mut self) {
        self.pending_text = None;
    }

    /// The in-progress stroke for live preview, if any.
    pub fn preview_stroke(&self) -> Option<Stroke> {
        let EditorState::Drawing {
            start,
            current,
            points,
        } = &self.state
        else {
            return None;
        };

        match self.tool {
            Tool::Freehand => {
                if points.len() < 2 {
                    return None;
                }
                Some(Stroke::Freehand(Freehand::from_points(
                    points.clone(),
                    self.style,
                )))
            }
            Tool::Arrow => Some(Stroke::Arrow(Arrow::new(*start, *current, self.style))),
            Tool::Line => Some(Stroke::Line(Line::new(*start, *current, self.style))),
            Tool::Circle => Some(Stroke::Circle(Circle::new(*start, *current, self.style))),
            Tool::Text => None,
        }
    }

    /// Process one frame of a two-finger pinch gesture.
    ///
    /// The first frame only records the inter-touch distance; later frames
    /// zoom by the distance ratio toward the touch midpoint. Returns whether
    /// the frame was accepted: pinching is mutually exclusive with an
    /// in-progress stroke or pan, and rejected frames change nothing.
    pub fn pinch_update(&mut self, a: Point, b: Point) -> bool {
        if !matches!(self.state, EditorState::Idle) {
            log::debug!("pinch rejected while drawing or panning");
            return false;
        }

        let distance = a.distance(b);
        let midpoint = a.midpoint(b);
        let anchor = Point::new(
            midpoint.x - self.surface_origin.x,
            midpoint.y - self.surface_origin.y,
        );

        match &mut self.pinch {
            None => {
                self.pinch = Some(PinchState {
                    last_distance: distance,
                });
            }
            Some(pinch) => {
                if pinch.last_distance > f64::EPSILON {
                    let factor = distance / pinch.last_distance;
                    self.camera.zoom_at(anchor, factor);
                }
                pinch.last_distance = distance;
            }
        }
        true
    }

    /// End the pinch gesture (fewer than two touches remain).
    pub fn pinch_end(&mut self) {
        self.pinch = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{MAX_ZOOM, MIN_ZOOM};
    use kurbo::Vec2;

    fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) -> EditorOutput {
        editor.handle_pointer(PointerEvent::down(from.0, from.1));
        editor.handle_pointer(PointerEvent::moved(to.0, to.1));
        editor.handle_pointer(PointerEvent::up(to.0, to.1))
    }

    #[test]
    fn test_freehand_stroke_lifecycle() {
        let mut editor = Editor::new();
        editor.handle_pointer(PointerEvent::down(0.0, 0.0));
        assert!(editor.is_drawing());

        for i in 1..50 {
            editor.handle_pointer(PointerEvent::moved(i as f64, i as f64));
        }
        let output = editor.handle_pointer(PointerEvent::up(49.0, 49.0));

        let EditorOutput::Completed(Stroke::Freehand(freehand)) = output else {
            panic!("expected a completed freehand stroke");
        };
        assert_eq!(freehand.points.len(), 50);
        assert_eq!(freehand.decimated.len(), 2);
        assert!(!editor.is_drawing());
    }

    #[test]
    fn test_single_point_freehand_discarded() {
        let mut editor = Editor::new();
        editor.handle_pointer(PointerEvent::down(10.0, 10.0));
        let output = editor.handle_pointer(PointerEvent::up(10.0, 10.0));
        assert!(matches!(output, EditorOutput::Ignored));
    }

    #[test]
    fn test_shape_endpoints_converted_to_logical_space() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Arrow);
        editor.camera.zoom = 2.0;
        editor.camera.offset = Vec2::new(30.0, 20.0);

        // screen = logical * 2 + (30, 20)
        let output = drag(&mut editor, (230.0, 220.0), (630.0, 220.0));
        let EditorOutput::Completed(Stroke::Arrow(arrow)) = output else {
            panic!("expected a completed arrow");
        };
        assert!((arrow.start.x - 100.0).abs() < 1e-9);
        assert!((arrow.start.y - 100.0).abs() < 1e-9);
        assert!((arrow.end.x - 300.0).abs() < 1e-9);
        assert!((arrow.end.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_surface_origin_subtracted() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Line);
        editor.set_surface_origin(Point::new(10.0, 10.0));

        let output = drag(&mut editor, (110.0, 110.0), (210.0, 110.0));
        let EditorOutput::Completed(Stroke::Line(line)) = output else {
            panic!("expected a completed line");
        };
        assert!((line.start.x - 100.0).abs() < 1e-9);
        assert!((line.end.x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_dragged_from_center() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Circle);
        let output = drag(&mut editor, (100.0, 100.0), (130.0, 140.0));
        let EditorOutput::Completed(Stroke::Circle(circle)) = output else {
            panic!("expected a completed circle");
        };
        assert!((circle.radius() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_secondary_button_pans() {
        let mut editor = Editor::new();
        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: PointerButton::Secondary,
            pressure: None,
        });
        assert!(editor.is_panning());

        editor.handle_pointer(PointerEvent::moved(110.0, 105.0));
        editor.handle_pointer(PointerEvent::moved(130.0, 115.0));
        editor.handle_pointer(PointerEvent::Up {
            position: Point::new(130.0, 115.0),
            button: PointerButton::Secondary,
        });

        assert!((editor.camera.offset.x - 30.0).abs() < 1e-9);
        assert!((editor.camera.offset.y - 15.0).abs() < 1e-9);
        assert!(!editor.is_panning());
    }

    #[test]
    fn test_pan_mode_overrides_drawing() {
        let mut editor = Editor::new();
        editor.set_pan_mode(true);
        editor.handle_pointer(PointerEvent::down(50.0, 50.0));
        assert!(editor.is_panning());
        assert!(!editor.is_drawing());
    }

    #[test]
    fn test_text_prompt_flow() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Text);
        editor.set_font_size(24.0);

        let output = drag(&mut editor, (40.0, 60.0), (40.0, 60.0));
        assert!(matches!(output, EditorOutput::TextPending));

        let stroke = editor.commit_text("Damp patch").expect("text stroke");
        let Stroke::Text(text) = stroke else {
            panic!("expected a text stroke");
        };
        assert_eq!(text.content, "Damp patch");
        assert!((text.position.x - 40.0).abs() < 1e-9);
        assert!((text.font_size - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_aborts_without_side_effects() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Text);

        drag(&mut editor, (40.0, 60.0), (40.0, 60.0));
        assert!(editor.commit_text("   ").is_none());
        // The prompt was consumed; a second answer has nothing to attach to.
        assert!(editor.commit_text("late").is_none());
        assert!(!editor.is_drawing());
    }

    #[test]
    fn test_cancel_text_discards_prompt() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Text);

        drag(&mut editor, (40.0, 60.0), (40.0, 60.0));
        editor.cancel_text();
        assert!(editor.commit_text("too late").is_none());
    }

    #[test]
    fn test_pinch_keeps_midpoint_fixed() {
        let mut editor = Editor::new();
        editor.camera.offset = Vec2::new(14.0, -3.0);
        let mid = Point::new(200.0, 150.0);

        let logical_before = editor.to_image(mid);
        editor.pinch_update(Point::new(180.0, 150.0), Point::new(220.0, 150.0));
        for spread in [30.0, 40.0, 55.0, 45.0, 80.0] {
            editor.pinch_update(
                Point::new(mid.x - spread, mid.y),
                Point::new(mid.x + spread, mid.y),
            );
            let logical_after = editor.to_image(mid);
            assert!((logical_after.x - logical_before.x).abs() < 1e-9);
            assert!((logical_after.y - logical_before.y).abs() < 1e-9);
        }
        editor.pinch_end();
        assert!(!editor.is_pinching());
    }

    #[test]
    fn test_pinch_zoom_clamped() {
        let mut editor = Editor::new();
        let mid = Point::new(100.0, 100.0);

        editor.pinch_update(Point::new(99.0, 100.0), Point::new(101.0, 100.0));
        for _ in 0..60 {
            // Keep doubling the spread.
            editor.pinch_update(Point::new(0.0, 100.0), Point::new(200.0, 100.0));
            editor.pinch_end();
            editor.pinch_update(Point::new(99.0, 100.0), Point::new(101.0, 100.0));
        }
        assert!(editor.camera.zoom <= MAX_ZOOM + f64::EPSILON);

        let mut editor = Editor::new();
        editor.pinch_update(Point::new(0.0, 100.0), Point::new(200.0, 100.0));
        for _ in 0..60 {
            editor.pinch_update(Point::new(mid.x - 1.0, 100.0), Point::new(mid.x + 1.0, 100.0));
            editor.pinch_end();
            editor.pinch_update(Point::new(0.0, 100.0), Point::new(200.0, 100.0));
        }
        assert!(editor.camera.zoom >= MIN_ZOOM - f64::EPSILON);
    }

    #[test]
    fn test_pinch_rejected_while_drawing() {
        let mut editor = Editor::new();
        editor.handle_pointer(PointerEvent::down(0.0, 0.0));
        editor.handle_pointer(PointerEvent::moved(10.0, 10.0));

        let zoom_before = editor.camera.zoom;
        assert!(!editor.pinch_update(Point::new(50.0, 50.0), Point::new(80.0, 50.0)));
        assert!(!editor.pinch_update(Point::new(40.0, 50.0), Point::new(90.0, 50.0)));
        assert!((editor.camera.zoom - zoom_before).abs() < f64::EPSILON);
        assert!(!editor.is_pinching());

        // The stroke still completes with uncorrupted geometry.
        editor.handle_pointer(PointerEvent::moved(20.0, 20.0));
        let output = editor.handle_pointer(PointerEvent::up(20.0, 20.0));
        let EditorOutput::Completed(Stroke::Freehand(freehand)) = output else {
            panic!("expected a completed freehand stroke");
        };
        assert_eq!(freehand.points.len(), 3);
    }

    #[test]
    fn test_pointer_down_rejected_while_pinching() {
        let mut editor = Editor::new();
        editor.pinch_update(Point::new(0.0, 0.0), Point::new(100.0, 0.0));

        let output = editor.handle_pointer(PointerEvent::down(50.0, 0.0));
        assert!(matches!(output, EditorOutput::Ignored));
        assert!(!editor.is_drawing());
    }

    #[test]
    fn test_set_tool_cancels_interaction() {
        let mut editor = Editor::new();
        editor.handle_pointer(PointerEvent::down(0.0, 0.0));
        assert!(editor.is_drawing());

        editor.set_tool(Tool::Arrow);
        assert!(!editor.is_drawing());
        assert!(matches!(
            editor.handle_pointer(PointerEvent::up(10.0, 10.0)),
            EditorOutput::Ignored
        ));
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut editor = Editor::new();
        editor.set_tool(Tool::Line);
        editor.handle_pointer(PointerEvent::down(0.0, 0.0));
        editor.handle_pointer(PointerEvent::moved(25.0, 30.0));

        let Some(Stroke::Line(preview)) = editor.preview_stroke() else {
            panic!("expected a line preview");
        };
        assert!((preview.end.x - 25.0).abs() < 1e-9);
        assert!((preview.end.y - 30.0).abs() < 1e-9);
    }
}
