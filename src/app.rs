//! Puzzle application state
//!
//! Owns the scene, the inventory, the placement session and everything
//! around them for one loaded puzzle. The frame loop in `main` calls
//! `update` then `draw` once per frame.

use macroquad::prelude::*;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigError, PuzzleDefinition};
use crate::game::{render_scene, LayerMask, World};
use crate::input::{CameraInput, InputState, PointerSample};
use crate::puzzle::{DropOutcome, PlacementContext, PlacementSession, PuzzleRun, ScoreBoard, SlotInventory};
use crate::quiz::{QuizOutcome, QuizSession};
use crate::rasterizer::{screen_to_ray, Camera, Color as RasterColor, Framebuffer, RasterSettings, Vec3};
use crate::storage::ResultStore;
use crate::thumbnail::{SceneThumbnails, ThumbnailRenderer};
use crate::ui::hud::{self, ImageCache};
use crate::ui::{ListLayout, Rect, SlotAction, SlotBar, SlotDispatch, SlotEvent, BG_COLOR};

/// Screen pixels per framebuffer pixel
const PIXEL_SCALE: f32 = 2.0;
const SLOT_BAR_HEIGHT: f32 = 140.0;
const QUIZ_LIST_WIDTH: f32 = 220.0;
const QUIZ_ROW_HEIGHT: f32 = 34.0;
/// Quiz clicks are not limited to drag reach
const QUIZ_RAY_DISTANCE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Drag pieces from the slot bar onto targets
    Drag,
    /// Pick a name, then click its target
    Quiz,
}

/// Camera that circles a fixed point
#[derive(Debug, Clone, Copy)]
pub struct OrbitRig {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitRig {
    const MIN_PITCH: f32 = 0.1;
    const MAX_PITCH: f32 = 1.45;
    const MIN_DISTANCE: f32 = 2.0;
    const MAX_DISTANCE: f32 = 18.0;

    pub fn from_camera(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.len().max(Self::MIN_DISTANCE);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
        }
    }

    pub fn apply(&mut self, input: CameraInput) {
        self.yaw += input.orbit_dx * 0.01;
        self.pitch = (self.pitch + input.orbit_dy * 0.01).clamp(Self::MIN_PITCH, Self::MAX_PITCH);
        self.distance = (self.distance * (1.0 - input.zoom * 0.1)).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(sy * cp, sp, cy * cp).scale(self.distance)
    }

    pub fn update_camera(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.look_at(self.target);
    }
}

/// Screen layout for the current window size
struct Layout {
    screen: Rect,
    scene: Rect,
    bar: SlotBar,
    list: ListLayout,
}

impl Layout {
    fn new(width: f32, height: f32, mode: Mode, slots: usize) -> Self {
        let screen = Rect::screen(width, height);
        let (scene, bar_rect) = match mode {
            Mode::Drag => (screen.remaining_after_bottom(SLOT_BAR_HEIGHT), screen.slice_bottom(SLOT_BAR_HEIGHT)),
            Mode::Quiz => (screen, Rect::default()),
        };
        let list_rect = screen.slice_right(QUIZ_LIST_WIDTH).pad(8.0);
        Self {
            screen,
            scene,
            bar: SlotBar::new(bar_rect, slots),
            list: ListLayout { rect: Rect::new(list_rect.x, list_rect.y + 70.0, list_rect.w, list_rect.h - 70.0), row_height: QUIZ_ROW_HEIGHT },
        }
    }

    /// Screen pointer in framebuffer pixels
    fn to_fb(&self, pointer: PointerSample) -> PointerSample {
        PointerSample {
            x: (pointer.x - self.scene.x) / PIXEL_SCALE,
            y: (pointer.y - self.scene.y) / PIXEL_SCALE,
            ..pointer
        }
    }
}

/// Last saved result for a map, if it was ever finished
fn previous_result(results: &ResultStore, map_id: &str) -> Option<(i32, f32)> {
    let time = results.best_time(map_id);
    (time > 0.0).then(|| (results.best_score(map_id), time))
}

pub struct PuzzleApp {
    def: PuzzleDefinition,
    mode: Mode,
    world: World,
    camera: Camera,
    orbit: OrbitRig,
    inventory: SlotInventory,
    session: PlacementSession<ScoreBoard>,
    quiz: QuizSession,
    thumbnails: ThumbnailRenderer,
    dispatch: SlotDispatch,
    run: PuzzleRun,
    results: ResultStore,
    /// Result on file before this run, for the end screen
    previous: Option<(i32, f32)>,
    fb: Framebuffer,
    input: InputState,
    cache: ImageCache,
    settings: RasterSettings,
}

impl PuzzleApp {
    pub fn new(def: PuzzleDefinition, mode: Mode, results: ResultStore) -> Result<Self, ConfigError> {
        let thumbnails = ThumbnailRenderer::new(def.thumbnails.clone());
        let camera = def.camera();
        let orbit = OrbitRig::from_camera(def.camera.position, def.camera.look_at);

        let mut app = Self {
            mode,
            world: World::new(),
            camera,
            orbit,
            inventory: SlotInventory::new(def.slots, def.build_catalog()?),
            session: PlacementSession::new(def.drag.clone(), ScoreBoard::default()),
            quiz: QuizSession::new(def.quiz_entries()),
            thumbnails,
            dispatch: SlotDispatch::new(def.slots),
            run: PuzzleRun::start(def.map_id.clone()),
            previous: None,
            results,
            fb: Framebuffer::new(1, 1),
            input: InputState::new(),
            cache: ImageCache::default(),
            settings: RasterSettings::default(),
            def,
        };
        app.start_run()?;
        Ok(app)
    }

    /// Build a fresh scene and deal the first pieces
    fn start_run(&mut self) -> Result<(), ConfigError> {
        self.world = World::new();
        self.def.populate(&mut self.world);
        self.inventory = SlotInventory::new(self.def.slots, self.def.build_catalog()?);
        let dealt = self
            .inventory
            .fill(&mut SceneThumbnails::new(&self.thumbnails, &mut self.world));

        self.session = PlacementSession::new(self.def.drag.clone(), ScoreBoard::default());
        self.quiz = QuizSession::new(self.def.quiz_entries());
        self.run = PuzzleRun::start(self.def.map_id.clone());
        self.previous = previous_result(&self.results, &self.def.map_id);
        self.orbit = OrbitRig::from_camera(self.def.camera.position, self.def.camera.look_at);
        self.camera = self.def.camera();

        info!(
            map_id = %self.def.map_id,
            mode = ?self.mode,
            dealt,
            targets = self.world.target_count(),
            entities = self.world.entity_count(),
            "run started"
        );
        Ok(())
    }

    fn score(&self) -> i32 {
        match self.mode {
            Mode::Drag => self.session.sink().score(),
            Mode::Quiz => self.quiz.score(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.input.poll();
        let layout = Layout::new(screen_width(), screen_height(), self.mode, self.inventory.len());
        self.resize_framebuffer(layout.scene);

        if is_key_pressed(KeyCode::R) {
            if let Err(e) = self.start_run() {
                warn!(error = %e, "restart failed");
            }
            return;
        }

        let dragging = self.session.is_dragging();
        if !dragging {
            self.orbit.apply(self.input.camera());
            self.orbit.update_camera(&mut self.camera);
        }

        let pointer = self.input.pointer();
        match self.mode {
            Mode::Drag => self.update_drag(dt, pointer, &layout),
            Mode::Quiz => self.update_quiz(dt, pointer, &layout),
        }

        self.run.tick(dt);
        self.cache.prune();
    }

    fn update_drag(&mut self, dt: f32, pointer: PointerSample, layout: &Layout) {
        if self.run.is_finished() {
            return;
        }

        let fb_pointer = layout.to_fb(pointer);
        let mut ctx = PlacementContext {
            world: &mut self.world,
            inventory: &mut self.inventory,
            thumbnails: &self.thumbnails,
            camera: &self.camera,
            viewport: (self.fb.width, self.fb.height),
        };

        if pointer.pressed && !self.session.is_dragging() {
            let action = layout
                .bar
                .hit(pointer.x, pointer.y)
                .and_then(|slot| self.dispatch.dispatch(slot, SlotEvent::PointerDown));
            if let Some(SlotAction::BeginDrag(slot)) = action {
                if let Err(e) = self.session.pickup(slot, &fb_pointer, &mut ctx) {
                    error!(slot, error = %e, "pickup from slot bar failed");
                    debug_assert!(false, "slot bar and inventory disagree on slot count");
                }
            }
        }

        if let Some(outcome) = self.session.tick(dt, &fb_pointer, &mut ctx) {
            debug!(?outcome, "drop resolved");
            if matches!(outcome, DropOutcome::Placed { .. }) {
                let score = self.session.sink().score();
                self.run.check_complete(&self.world, score, &mut self.results);
            }
        }
    }

    fn update_quiz(&mut self, dt: f32, pointer: PointerSample, layout: &Layout) {
        self.quiz.tick(dt);
        if !pointer.pressed || self.run.is_finished() {
            return;
        }

        if let Some(row) = layout.list.hit(pointer.x, pointer.y, self.quiz.entries().len()) {
            let id = self.quiz.entries()[row].id.clone();
            self.quiz.select(&id);
            return;
        }
        if !layout.scene.contains(pointer.x, pointer.y) {
            return;
        }

        let p = layout.to_fb(pointer);
        let ray = screen_to_ray(p.x, p.y, self.fb.width, self.fb.height, &self.camera);
        let Some(hit) = self.world.raycast(&ray, QUIZ_RAY_DISTANCE, LayerMask::TARGETS) else {
            return;
        };
        if let QuizOutcome::Solved { complete: true, .. } = self.quiz.target_clicked(&mut self.world, hit.entity) {
            let score = self.quiz.score();
            self.run.check_complete(&self.world, score, &mut self.results);
        }
    }

    fn resize_framebuffer(&mut self, scene: Rect) {
        let w = (scene.w / PIXEL_SCALE).max(1.0) as usize;
        let h = (scene.h / PIXEL_SCALE).max(1.0) as usize;
        if (w, h) != (self.fb.width, self.fb.height) {
            self.fb.resize(w, h);
        }
    }

    pub fn draw(&mut self) {
        clear_background(BG_COLOR);
        let layout = Layout::new(screen_width(), screen_height(), self.mode, self.inventory.len());

        self.fb.clear_gradient(RasterColor::new(38, 44, 58), RasterColor::new(16, 18, 24));
        render_scene(&self.world, &mut self.fb, &self.camera, &self.settings);
        hud::draw_framebuffer(&self.fb, layout.scene);

        let pointer = self.input.pointer();
        match self.mode {
            Mode::Drag => hud::draw_slot_bar(&layout.bar, self.inventory.views(), &mut self.cache, (pointer.x, pointer.y)),
            Mode::Quiz => {
                hud::draw_quiz_list(&layout.list, self.quiz.entries(), self.quiz.selected());
                if self.quiz.wrong_mark_visible() {
                    hud::draw_wrong_mark(layout.scene);
                }
            }
        }

        hud::draw_status(layout.screen, &self.def.display_name, self.score(), self.run.elapsed());
        if self.run.is_finished() {
            hud::draw_end_screen(layout.screen, self.score(), self.run.elapsed(), self.previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Entity;
    use crate::storage::{LocalStorage, ResultSink};
    use tempfile::TempDir;

    fn demo_app() -> (TempDir, PuzzleApp) {
        let dir = TempDir::new().unwrap();
        let results = ResultStore::open(LocalStorage::with_base_dir(dir.path())).unwrap();
        let app = PuzzleApp::new(PuzzleDefinition::bundled().unwrap(), Mode::Drag, results).unwrap();
        (dir, app)
    }

    fn press_slot(layout: &Layout, slot: usize) -> PointerSample {
        let rect = layout.bar.slot_rects()[slot];
        PointerSample { x: rect.center_x(), y: rect.center_y(), down: true, pressed: true, released: false }
    }

    fn solve_all(app: &mut PuzzleApp) {
        let targets: Vec<Entity> = app.world.targets.iter().filter_map(|(i, _)| app.world.entity_at(i)).collect();
        for t in targets {
            let id = app.world.targets.get(t).unwrap().expected_id().to_string();
            app.world.check_target(t, &id);
        }
    }

    #[test]
    fn test_slot_press_starts_drag() {
        let (_dir, mut app) = demo_app();
        let layout = Layout::new(800.0, 600.0, Mode::Drag, app.inventory.len());
        app.update_drag(1.0 / 60.0, press_slot(&layout, 0), &layout);
        assert!(app.session.is_dragging());
    }

    #[test]
    fn test_finished_run_ignores_slot_presses() {
        let (_dir, mut app) = demo_app();
        let layout = Layout::new(800.0, 600.0, Mode::Drag, app.inventory.len());
        solve_all(&mut app);
        assert!(app.run.check_complete(&app.world, 0, &mut app.results));

        app.update_drag(1.0 / 60.0, press_slot(&layout, 0), &layout);
        assert!(!app.session.is_dragging());
    }

    #[test]
    fn test_previous_result_from_store() {
        let dir = TempDir::new().unwrap();
        let mut results = ResultStore::open(LocalStorage::with_base_dir(dir.path())).unwrap();
        assert_eq!(previous_result(&results, "demo"), None);

        results.save_result("demo", 40, 73.5).unwrap();
        assert_eq!(previous_result(&results, "demo"), Some((40, 73.5)));
    }

    #[test]
    fn test_orbit_round_trip() {
        let position = Vec3::new(0.0, 4.0, -6.0);
        let rig = OrbitRig::from_camera(position, Vec3::ZERO);
        assert!((rig.position() - position).len() < 1e-4);
    }

    #[test]
    fn test_orbit_clamps() {
        let mut rig = OrbitRig::from_camera(Vec3::new(0.0, 4.0, -6.0), Vec3::ZERO);
        rig.apply(CameraInput { orbit_dx: 0.0, orbit_dy: 10_000.0, zoom: 100.0 });
        assert_eq!(rig.pitch, OrbitRig::MAX_PITCH);
        assert_eq!(rig.distance, OrbitRig::MIN_DISTANCE);
    }

    #[test]
    fn test_layout_maps_pointer_to_framebuffer() {
        let layout = Layout::new(800.0, 600.0, Mode::Drag, 3);
        assert_eq!(layout.scene, Rect::new(0.0, 0.0, 800.0, 460.0));
        let p = layout.to_fb(PointerSample { x: 400.0, y: 230.0, ..Default::default() });
        assert_eq!((p.x, p.y), (200.0, 115.0));
    }
}
