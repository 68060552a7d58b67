use std::time::Instant;

use anyhow::Result;
use log::info;
use tinsel::{
    config::Settings,
    wish::{WishBoard, WishService, WishStatus},
};
use tokio::runtime::Runtime;
use winit::{event::VirtualKeyCode, window::Window};

use crate::{
    entity::Scene,
    renderer::Renderer,
    window::{HasSize, Size},
};

const TITLE: &str = "Tinsel";
/// Longest step fed to the animation after a stall.
const MAX_FRAME_DELTA: f32 = 0.1;

pub struct App {
    window: Window,
    scene: Scene,
    renderer: Renderer,
    runtime: Runtime,
    wish: WishBoard,
    last_tick: Instant,
}

impl App {
    pub async fn new(window: Window, settings: Settings, runtime: Runtime) -> Result<Self> {
        let mut scene = Scene::new(window.size().aspect_ratio(), settings.seed);
        let renderer = Renderer::new(&window).await?;
        scene.tree.mount();

        let service = WishService::new(settings.api_key);
        if !service.has_credential() {
            info!("GEMINI_API_KEY is not set, wishes will use the fallback text");
        }
        let wish = WishBoard::new(service, settings.wish_theme);

        let app = Self {
            window,
            scene,
            renderer,
            runtime,
            wish,
            last_tick: Instant::now(),
        };
        app.update_title();
        Ok(app)
    }

    pub fn on_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let size: Size = size.into();
        self.scene.camera.aspect_ratio = size.aspect_ratio();
        self.renderer.resize(size);
    }

    pub fn on_key_up(&mut self, keycode: VirtualKeyCode) {
        match keycode {
            VirtualKeyCode::Space => {
                self.scene.tree.toggle();
                self.update_title();
            }
            VirtualKeyCode::W => {
                let is_formed = self.scene.tree.is_formed();
                if self.wish.request(self.runtime.handle(), is_formed) {
                    self.update_title();
                } else if !is_formed {
                    info!("Form the tree before asking for a wish");
                }
            }
            _ => (),
        }
    }

    fn update_title(&self) {
        let hint = if self.scene.tree.is_formed() {
            "Space: scatter | W: wish"
        } else {
            "Space: form the tree"
        };
        let title = match self.wish.status() {
            WishStatus::Idle => format!("{} | {}", TITLE, hint),
            WishStatus::Loading => format!("{} | Writing a wish...", TITLE),
            WishStatus::Ready(wish) => format!("{} | {}", TITLE, wish),
        };
        self.window.set_title(&title);
    }

    pub fn render(&mut self) -> Result<()> {
        let now = Instant::now();
        let delta = now
            .duration_since(self.last_tick)
            .as_secs_f32()
            .min(MAX_FRAME_DELTA);
        self.last_tick = now;

        self.scene.tree.tick(delta);

        if self.wish.poll() {
            if let WishStatus::Ready(wish) = self.wish.status() {
                info!("Wish: {}", wish);
            }
            self.update_title();
        }

        self.renderer.render(&mut self.scene)
    }
}
