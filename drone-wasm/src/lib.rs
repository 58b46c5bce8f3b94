use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use drone_core::input::{can_remove, can_start, parse_coordinate, parse_duration};
use drone_core::{LatLng, Stepper};
use drone_shared::{SimulatorSettings, Snapshot};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

mod interval;
use interval::TickInterval;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// State shared between the simulator and its interval callback.
struct Session {
    stepper: Stepper,
    listener: Option<js_sys::Function>,
    canvas: Option<MarkerCanvas>,
}

struct MarkerCanvas {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

#[wasm_bindgen]
pub struct DroneSimulator {
    session: Rc<RefCell<Session>>,
    interval: Option<TickInterval>,
    tick_interval_ms: u32,
}

impl DroneSimulator {
    fn from_settings(settings: &SimulatorSettings) -> Self {
        console_log!(
            "Initializing drone simulator with {} drone(s)",
            settings.initial_drones
        );
        Self {
            session: Rc::new(RefCell::new(Session {
                stepper: Stepper::with_drones(settings.initial_drones),
                listener: None,
                canvas: None,
            })),
            interval: None,
            tick_interval_ms: u32::try_from(settings.tick_interval_ms).unwrap_or(u32::MAX),
        }
    }

    /// Replaces the running interval, if any, with a fresh one.
    fn arm(&mut self) -> Result<(), JsValue> {
        self.interval = None;

        let session = Rc::clone(&self.session);
        let period = i32::try_from(self.tick_interval_ms).unwrap_or(i32::MAX);
        self.interval = Some(TickInterval::every(period, move || {
            let (report, snapshot) = {
                let mut session = session.borrow_mut();
                let report = session.stepper.tick();
                if let (Some(_), Some(view)) = (report, &session.canvas) {
                    if let Err(err) = view.draw(&session.stepper) {
                        console_log!("Render failed: {:?}", err);
                    }
                }
                (report, Snapshot::from(&session.stepper))
            };
            let Some(report) = report else {
                return false;
            };
            // Listener may call back into the simulator, so no borrow is held.
            let listener = session.borrow().listener.clone();
            if let Some(listener) = listener {
                if let Err(err) = notify(&listener, &snapshot) {
                    console_log!("Listener failed: {:?}", err);
                }
            }
            if report.finished {
                console_log!("Simulation finished after {} tick(s)", report.elapsed_ticks);
            }
            !report.finished
        })?);
        Ok(())
    }

    /// Arms the interval for a run the stepper has just begun.
    fn arm_run(&mut self) -> Result<(), JsValue> {
        let armed = self.arm();
        cancel_unless_armed(&mut self.session.borrow_mut().stepper, armed)
    }

    fn snapshot_value(&self) -> Snapshot {
        Snapshot::from(&self.session.borrow().stepper)
    }
}

#[wasm_bindgen]
impl DroneSimulator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DroneSimulator {
        Self::from_settings(&SimulatorSettings::default())
    }

    /// Builds a simulator from a JSON `SimulatorSettings` document.
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(json: &str) -> Result<DroneSimulator, JsValue> {
        let settings =
            SimulatorSettings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::from_settings(&settings))
    }

    /// Takes effect on the next start or resume.
    pub fn set_tick_interval(&mut self, ms: u32) {
        self.tick_interval_ms = ms;
    }

    pub fn can_start(&self, latitude: &str, longitude: &str, time: &str) -> bool {
        can_start(latitude, longitude, time, self.is_simulating())
    }

    pub fn start(&mut self, latitude: &str, longitude: &str, time: &str) -> Result<(), JsValue> {
        let config = parse_duration(time).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let target = LatLng::new(parse_coordinate(latitude), parse_coordinate(longitude));

        self.session.borrow_mut().stepper.start_with(target, config);
        console_log!(
            "Starting simulation toward ({}, {}) over {} tick(s)",
            target.lat,
            target.lng,
            config.duration_ticks()
        );
        self.arm_run()
    }

    pub fn pause(&mut self) {
        self.interval = None;
        self.session.borrow_mut().stepper.pause();
    }

    /// Starts the last run over from tick zero.
    pub fn resume(&mut self) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .stepper
            .resume()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.arm_run()
    }

    pub fn cancel(&mut self) {
        self.interval = None;
        self.session.borrow_mut().stepper.cancel();
    }

    pub fn add_drone(&mut self) -> usize {
        let count = self.session.borrow_mut().stepper.add_point();
        console_log!("Added drone. Total drones: {}", count);
        count
    }

    /// Removes the most recently added drone, always leaving at least one.
    pub fn remove_drone(&mut self) -> bool {
        let mut session = self.session.borrow_mut();
        if !can_remove(session.stepper.len()) {
            return false;
        }
        session.stepper.remove_last().is_some()
    }

    pub fn can_remove_drone(&self) -> bool {
        can_remove(self.drone_count())
    }

    pub fn drone_count(&self) -> usize {
        self.session.borrow().stepper.len()
    }

    pub fn progress(&self) -> f64 {
        self.session.borrow().stepper.progress()
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.session.borrow().stepper.elapsed_ticks()
    }

    pub fn is_simulating(&self) -> bool {
        self.session.borrow().stepper.is_simulating()
    }

    /// Whether an interval is still delivering ticks.
    pub fn is_ticking(&self) -> bool {
        self.interval.as_ref().is_some_and(TickInterval::is_active)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        snapshot_to_js(&self.snapshot_value())
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.snapshot_value()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Registers a function called with a snapshot after every tick.
    pub fn set_listener(&mut self, listener: js_sys::Function) {
        self.session.borrow_mut().listener = Some(listener);
    }

    pub fn clear_listener(&mut self) {
        self.session.borrow_mut().listener = None;
    }

    pub fn attach_canvas(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let view = MarkerCanvas { canvas, context };
        let mut session = self.session.borrow_mut();
        view.draw(&session.stepper)?;
        session.canvas = Some(view);
        Ok(())
    }

    /// Redraws the attached canvas, if any. Ticks redraw it on their own.
    pub fn render(&self) -> Result<(), JsValue> {
        let session = self.session.borrow();
        match &session.canvas {
            Some(view) => view.draw(&session.stepper),
            None => Ok(()),
        }
    }
}

impl MarkerCanvas {
    /// Draws drones and the target over a cleared background.
    fn draw(&self, stepper: &Stepper) -> Result<(), JsValue> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        let ctx = &self.context;

        ctx.set_fill_style_str("#0b1a2a");
        ctx.fill_rect(0.0, 0.0, width, height);

        if let Some(target) = stepper.target().filter(LatLng::is_finite) {
            let (x, y) = project(target, width, height);
            ctx.begin_path();
            ctx.arc(x, y, 7.0, 0.0, TAU)?;
            ctx.set_stroke_style_str("#ff5555");
            ctx.set_line_width(2.0);
            ctx.stroke();
        }

        // Non-finite drones have no place on the map.
        for point in stepper.points().iter().filter(|p| p.is_finite()) {
            let (x, y) = project(*point, width, height);
            ctx.begin_path();
            ctx.arc(x, y, 4.0, 0.0, TAU)?;
            ctx.set_fill_style_str("#7fdbff");
            ctx.fill();
        }

        Ok(())
    }
}

impl Default for DroneSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Equirectangular projection onto a `width` x `height` canvas.
fn project(p: LatLng, width: f64, height: f64) -> (f64, f64) {
    let x = (p.lng + 180.0) / 360.0 * width;
    let y = (90.0 - p.lat) / 180.0 * height;
    (x, y)
}

/// Leaves the stepper cancelled when no interval could be armed for it, so
/// the start control is not stuck disabled.
fn cancel_unless_armed<E>(stepper: &mut Stepper, armed: Result<(), E>) -> Result<(), E> {
    if armed.is_err() {
        stepper.cancel();
    }
    armed
}

fn snapshot_to_js(snapshot: &Snapshot) -> Result<JsValue, JsValue> {
    let json = snapshot
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn notify(listener: &js_sys::Function, snapshot: &Snapshot) -> Result<JsValue, JsValue> {
    listener.call1(&JsValue::NULL, &snapshot_to_js(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_corners() {
        assert_eq!(project(LatLng::new(90.0, -180.0), 360.0, 180.0), (0.0, 0.0));
        assert_eq!(project(LatLng::new(-90.0, 180.0), 360.0, 180.0), (360.0, 180.0));
        assert_eq!(project(LatLng::home(), 200.0, 100.0), (100.0, 50.0));
    }

    #[test]
    fn test_failed_arm_leaves_start_available() {
        let mut stepper = Stepper::new();
        stepper.start(LatLng::new(1.0, 1.0), 5).unwrap();

        let armed = cancel_unless_armed(&mut stepper, Err("no global window"));

        assert_eq!(armed, Err("no global window"));
        assert!(!stepper.is_simulating());
        assert!(can_start("1", "1", "5", stepper.is_simulating()));
        assert!(stepper.tick().is_none());
    }

    #[test]
    fn test_successful_arm_keeps_run_going() {
        let mut stepper = Stepper::new();
        stepper.start(LatLng::new(1.0, 1.0), 5).unwrap();

        assert_eq!(cancel_unless_armed::<&str>(&mut stepper, Ok(())), Ok(()));
        assert!(stepper.is_simulating());
    }
}
