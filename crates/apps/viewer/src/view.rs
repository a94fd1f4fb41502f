use formats::{RegionDataset, VisitedPlaces};
use foundation::time::Time;
use gpu::{DrawCommand, RenderBackend, RenderFrame, SurfaceSize};
use runtime::metrics::names;
use runtime::{EventBus, FrameLoop, FrameRequestId, FrameScheduler, Metrics, Throttle};
use scene::{
    GlobeConfig, MaterialManager, RegionBuilder, RegionPicker, RegionRegistry, SceneController,
    Theme, Viewport, region_label,
};
use tracing::{debug, info, warn};

use crate::error::ViewError;
use crate::events::GlobeEvent;
use crate::gpu_scene::GpuScene;
use crate::host::HostBindings;

/// Data a build is made from. Any change means a full rebuild.
#[derive(Debug, Clone, Default)]
pub struct GlobeInputs {
    pub base: RegionDataset,
    /// Subdivisions of the detailed country; replaces its base outline.
    pub detailed: Option<RegionDataset>,
    pub visited: VisitedPlaces,
}

struct MountedScene {
    registry: RegionRegistry,
    controller: SceneController,
    gpu: GpuScene,
}

/// The globe component as seen by its host.
///
/// Mounting acquires the surface, builds and uploads the regions, attaches
/// host listeners and starts the frame loop, in that order. Teardown undoes
/// all of it before anything else is built, so two loops never share a
/// surface. Dropping the view tears it down as well.
pub struct GlobeView<B: RenderBackend, S: FrameScheduler, H: HostBindings> {
    config: GlobeConfig,
    backend: B,
    frame_loop: FrameLoop<S>,
    host: H,
    builder: RegionBuilder,
    picker: RegionPicker,
    materials: MaterialManager,
    scene: Option<MountedScene>,
    throttle: Throttle,
    last_pointer: Option<[f64; 2]>,
    /// A throttled pointer move still waits to be picked.
    pick_pending: bool,
    hovered: Option<String>,
    selected: Option<String>,
    events: EventBus<GlobeEvent>,
    metrics: Metrics,
}

impl<B: RenderBackend, S: FrameScheduler, H: HostBindings> GlobeView<B, S, H> {
    pub fn new(config: GlobeConfig, backend: B, scheduler: S, host: H, theme: Theme) -> Self {
        let builder = RegionBuilder::new(config.build.clone());
        let picker = RegionPicker::new(config.pick.clone(), config.build.globe_radius);
        let throttle = Throttle::new(config.pick.pointer_throttle_s);
        Self {
            config,
            backend,
            frame_loop: FrameLoop::new(scheduler),
            host,
            builder,
            picker,
            materials: MaterialManager::new(theme),
            scene: None,
            throttle,
            last_pointer: None,
            pick_pending: false,
            hovered: None,
            selected: None,
            events: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    /// Builds the scene into the host surface, tearing down any previous one
    /// first. On error nothing stays attached and `mount` can be retried.
    pub fn mount(&mut self, inputs: &GlobeInputs, now: Time) -> Result<(), ViewError> {
        self.teardown();

        let size = match self.backend.attach() {
            Ok(size) => size,
            Err(err) => {
                warn!(%err, "render surface unavailable, mount aborted");
                return Err(err.into());
            }
        };

        let mut registry =
            self.builder.build(&inputs.base, inputs.detailed.as_ref(), &inputs.visited);
        self.materials.paint(&mut registry);

        let gpu = match GpuScene::upload(&mut self.backend, &registry) {
            Ok(gpu) => gpu,
            Err(err) => {
                self.backend.detach();
                warn!(%err, "region upload failed, mount aborted");
                return Err(err.into());
            }
        };

        let mut controller = SceneController::new(
            self.config.controls.clone(),
            self.config.framing.clone(),
            viewport_of(size),
        );
        controller.frame_default_view(now);

        self.metrics.set_gauge(names::REGIONS, registry.len() as i64);
        self.metrics.set_gauge(names::LIVE_BUFFERS, gpu.len() as i64);
        info!(
            regions = registry.len(),
            buffers = gpu.len(),
            width = size.width,
            height = size.height,
            "globe mounted"
        );
        self.scene = Some(MountedScene {
            registry,
            controller,
            gpu,
        });

        self.host.attach_listeners();
        self.host.observe_theme();
        self.frame_loop.start();
        Ok(())
    }

    /// Rebuilds from new inputs. The old scene is gone before the new one is
    /// built, even if the rebuild fails.
    pub fn update(&mut self, inputs: &GlobeInputs, now: Time) -> Result<(), ViewError> {
        let was_mounted = self.is_mounted();
        self.mount(inputs, now)?;
        if was_mounted {
            self.metrics.incr(names::REBUILDS);
            debug!("globe rebuilt");
        }
        Ok(())
    }

    /// Final teardown. Safe to call any number of times, mounted or not.
    pub fn dispose(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };
        self.frame_loop.stop();
        self.materials.set_highlight(None, &mut scene.registry);
        scene.gpu.release(&mut self.backend);
        self.backend.detach();
        self.host.detach_listeners();
        self.host.disconnect_theme();

        self.throttle.reset();
        self.last_pointer = None;
        self.pick_pending = false;
        if self.selected.take().is_some() {
            self.events.emit(GlobeEvent::Selected(None));
        }
        if self.hovered.take().is_some() {
            self.events.emit(GlobeEvent::HoverChanged(None));
        }
        self.metrics.set_gauge(names::LIVE_BUFFERS, 0);
        self.metrics.set_gauge(names::REGIONS, 0);
        info!(metrics = %self.metrics, "globe torn down");
    }

    /// Pushes the host's theme. Recolors in place and renders immediately.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), ViewError> {
        let Some(scene) = self.scene.as_mut() else {
            self.materials = MaterialManager::new(theme);
            return Ok(());
        };
        if self.materials.apply_theme(theme, &mut scene.registry) {
            self.render_extra()?;
        }
        Ok(())
    }

    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), ViewError> {
        self.backend.resize(SurfaceSize::new(width, height));
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };
        scene.controller.set_viewport(Viewport::new(width, height));
        self.render_extra()
    }

    pub fn on_pointer_down(&mut self, x_px: f64, y_px: f64) {
        if let Some(scene) = self.scene.as_mut() {
            scene.controller.controls_mut().on_pointer_down([x_px, y_px]);
        }
    }

    pub fn on_pointer_up(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.controller.controls_mut().on_pointer_up();
        }
    }

    /// Zooms toward or away from the globe; positive `delta` zooms out.
    pub fn on_wheel(&mut self, delta: f64) {
        if let Some(scene) = self.scene.as_mut() {
            scene.controller.controls_mut().on_wheel(delta);
        }
    }

    /// Drags the camera when a button is held; hover picking is throttled.
    /// A throttled move is picked on a later frame once the interval passes.
    pub fn on_pointer_move(&mut self, x_px: f64, y_px: f64, now: Time) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let height = scene.controller.viewport().height as f64;
        scene
            .controller
            .controls_mut()
            .on_pointer_move([x_px, y_px], height);
        self.last_pointer = Some([x_px, y_px]);

        if !self.throttle.try_acquire(now) {
            self.metrics.incr(names::PICKS_THROTTLED);
            self.pick_pending = true;
            return;
        }
        self.pick_pending = false;
        self.refresh_hover(now);
    }

    /// Click picking is never throttled. Sets (or clears) the sticky selection.
    pub fn on_click(&mut self, x_px: f64, y_px: f64, now: Time) {
        if !self.is_mounted() {
            return;
        }
        self.last_pointer = Some([x_px, y_px]);
        self.pick_pending = false;
        let hit = self.pick(x_px, y_px).map(str::to_string);
        self.metrics.incr(names::PICKS);
        if hit != self.selected {
            self.selected = hit.clone();
            self.events.emit(GlobeEvent::Selected(hit.clone()));
        }
        self.apply_hover(hit, now);
    }

    /// Pointer left the surface: hover clears, the selection stays.
    pub fn on_pointer_leave(&mut self) {
        self.last_pointer = None;
        self.pick_pending = false;
        if let Some(scene) = self.scene.as_mut() {
            scene.controller.release_hover_hold();
            scene.controller.controls_mut().on_pointer_up();
        }
        self.show(self.selected.clone());
    }

    /// Handles a fired frame request. Returns `Ok(false)` for stale requests.
    pub fn on_frame(&mut self, id: FrameRequestId, now: Time) -> Result<bool, ViewError> {
        let Some(frame) = self.frame_loop.begin_frame(id, now) else {
            return Ok(false);
        };
        let Some(scene) = self.scene.as_mut() else {
            return Ok(false);
        };
        let update = scene.controller.update(&frame);
        let throttled_move_due = self.pick_pending && self.throttle.try_acquire(now);
        if throttled_move_due {
            self.pick_pending = false;
        }
        if (update.repick || throttled_move_due) && self.last_pointer.is_some() {
            self.refresh_hover(now);
        }
        self.render()?;
        self.metrics.incr(names::FRAMES_DRAWN);
        self.frame_loop.end_frame();
        Ok(true)
    }

    /// Region id under pointer pixel `(x_px, y_px)`; a pure query.
    pub fn pick(&self, x_px: f64, y_px: f64) -> Option<&str> {
        let scene = self.scene.as_ref()?;
        let camera = scene.controller.camera();
        let hit = self.picker.pick(
            &scene.registry,
            &camera,
            scene.controller.viewport(),
            x_px,
            y_px,
        )?;
        scene.registry.get(hit.region).map(|r| r.id.as_str())
    }

    pub fn hovered_region(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn selected_region(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Tooltip text for the hovered region.
    pub fn hovered_label(&self) -> Option<String> {
        let id = self.hovered.as_deref()?;
        let visited = self.registry()?.by_id(id)?.visited;
        Some(region_label(id, visited))
    }

    pub fn drain_events(&mut self) -> Vec<GlobeEvent> {
        self.events.drain()
    }

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn registry(&self) -> Option<&RegionRegistry> {
        self.scene.as_ref().map(|s| &s.registry)
    }

    pub fn controller(&self) -> Option<&SceneController> {
        self.scene.as_ref().map(|s| &s.controller)
    }

    pub fn theme(&self) -> Theme {
        self.materials.theme()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn frame_loop(&self) -> &FrameLoop<S> {
        &self.frame_loop
    }

    fn refresh_hover(&mut self, now: Time) {
        let hit = self
            .last_pointer
            .and_then(|[x, y]| self.pick(x, y))
            .map(str::to_string);
        self.metrics.incr(names::PICKS);
        self.apply_hover(hit, now);
    }

    fn apply_hover(&mut self, hit: Option<String>, now: Time) {
        if let Some(scene) = self.scene.as_mut() {
            scene.controller.mark_picked();
            if hit.is_some() {
                scene.controller.hold_for_hover(now);
            } else {
                scene.controller.release_hover_hold();
            }
        }
        let shown = hit.or_else(|| self.selected.clone());
        self.show(shown);
    }

    fn show(&mut self, shown: Option<String>) {
        if shown == self.hovered {
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            let key = shown.as_deref().and_then(|id| scene.registry.key_of(id));
            self.materials.set_highlight(key, &mut scene.registry);
        }
        self.hovered = shown;
        self.events.emit(GlobeEvent::HoverChanged(self.hovered.clone()));
    }

    /// Out-of-cadence render after a resize or theme change.
    fn render_extra(&mut self) -> Result<(), ViewError> {
        self.metrics.incr(names::EXTRA_RENDERS);
        self.render()
    }

    /// Draws one frame. A failed submit is a lost context: the scene is torn
    /// down and the error returned.
    fn render(&mut self) -> Result<(), ViewError> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };
        let camera = scene.controller.camera();
        let mut frame = RenderFrame::new(self.materials.clear_color(), camera.view_proj());
        frame.push(DrawCommand::Globe {
            radius: self.config.build.globe_radius as f32,
            color: self.materials.globe_color(),
        });
        scene.gpu.record(&scene.registry, &mut frame);

        if let Err(err) = self.backend.submit(&frame) {
            warn!(%err, "frame submit failed, tearing down");
            self.teardown();
            return Err(err.into());
        }
        Ok(())
    }
}

impl<B: RenderBackend, S: FrameScheduler, H: HostBindings> Drop for GlobeView<B, S, H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn viewport_of(size: SurfaceSize) -> Viewport {
    Viewport::new(size.width, size.height)
}
