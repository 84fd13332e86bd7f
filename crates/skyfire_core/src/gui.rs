// crates/skyfire_core/src/gui.rs
use egui::Context;
use winit::{event::WindowEvent, window::Window};

/// Egui integration. Only used as a text painter; it never takes input.
pub struct GuiSystem {
    pub ctx: Context,
    state: egui_winit::State,
}

impl GuiSystem {
    pub fn new(window: &Window) -> Self {
        let ctx = Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
        );
        Self { ctx, state }
    }

    /// Keeps egui's idea of the screen size and scale factor current.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    /// Prepare the frame, run the paint closure, and output draw data
    pub fn draw(
        &mut self,
        window: &Window,
        run_ui: impl FnOnce(&Context),
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta, f32) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_frame(raw_input);

        run_ui(&self.ctx);

        let output = self.ctx.end_frame();
        self.state
            .handle_platform_output(window, output.platform_output);

        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        (primitives, output.textures_delta, output.pixels_per_point)
    }
}
