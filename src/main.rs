//! Drop Catcher entry point
//!
//! Browser: wires the page's DOM to the round simulation and runs the frame
//! loop. Native: plays a headless round with a simple bot and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement};

    use drop_catcher::audio::{AudioManager, SoundEffect};
    use drop_catcher::sim::{Difficulty, DropId, DropKind, GameEvent, Outcome, Round, WaterDrop};
    use drop_catcher::{Error, Settings};

    /// Longest frame we simulate in one go (tab switches, debugger pauses)
    const MAX_FRAME_MS: f64 = 250.0;
    /// Class flashes and shakes last this long
    const FEEDBACK_MS: i32 = 260;
    const CONFETTI_COUNT: usize = 120;
    const CONFETTI_COLORS: [&str; 8] = [
        "#FFC907", "#2E9DF7", "#8BD1CB", "#4FCB53", "#FF902A", "#F5402C", "#159A48", "#F16061",
    ];

    /// Page elements the game drives
    struct Elements {
        container: HtmlElement,
        score: Element,
        time: Element,
        start_btn: Element,
        message: Element,
        confetti: Element,
        difficulty: HtmlSelectElement,
        sound_toggle: Option<HtmlInputElement>,
    }

    /// Game instance holding all state
    struct Game {
        round: Round,
        audio: AudioManager,
        settings: Settings,
        document: Document,
        el: Elements,
        accumulator: f64,
        last_time: f64,
    }

    impl Game {
        /// Pull the current control values into settings
        fn read_settings(&mut self) {
            // An unrecognised option keeps the last good choice; starting
            // with it is rejected by the round instead
            if let Ok(difficulty) = self.el.difficulty.value().parse::<Difficulty>() {
                self.settings.difficulty = difficulty;
            }
            if let Some(toggle) = &self.el.sound_toggle {
                self.settings.sound_enabled = toggle.checked();
            }
            self.audio.set_volume(self.settings.effective_volume());
            self.round.set_options(self.settings.round_options());
        }

        /// Run simulation up to the frame time
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            self.accumulator += dt;
            let whole_ms = self.accumulator.floor();
            self.accumulator -= whole_ms;
            self.round.advance(whole_ms as u64);
        }
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
            .dyn_into::<T>()
            .map_err(|_| JsValue::from_str(&format!("#{id} has an unexpected type")))
    }

    /// Log a rejected command; racing input makes most of these expected
    fn log_rejected(err: &Error) {
        if err.is_benign() {
            log::debug!("Ignored: {}", err);
        } else {
            log::warn!("{}", err);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Drop Catcher starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let el = Elements {
            container: element(&document, "game-container")?,
            score: element(&document, "score")?,
            time: element(&document, "time")?,
            start_btn: element(&document, "start-btn")?,
            message: element(&document, "message")?,
            confetti: element(&document, "confetti")?,
            difficulty: element(&document, "difficulty")?,
            sound_toggle: element(&document, "sound-enabled").ok(),
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            round: Round::new(seed),
            audio: AudioManager::new(),
            settings: Settings::default(),
            document,
            el,
            accumulator: 0.0,
            last_time: 0.0,
        }));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut g = game.borrow_mut();
            g.read_settings();
            let time = g.round.config().duration_secs.to_string();
            g.el.time.set_text_content(Some(&time));
        }

        setup_start_button(game.clone())?;
        setup_sound_toggle(game.clone())?;
        setup_drop_input(game.clone())?;
        request_animation_frame(game);

        log::info!("Drop Catcher ready!");
        Ok(())
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let btn = game.borrow().el.start_btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.read_settings();
                let (w, h) = (
                    g.el.container.client_width() as f32,
                    g.el.container.client_height() as f32,
                );
                g.round.set_play_area(w, h);
                let profile = g.el.difficulty.value();
                if let Err(err) = g.round.start_or_reset(&profile) {
                    log_rejected(&err);
                }
            }
            pump(&game);
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_sound_toggle(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(toggle) = game.borrow().el.sound_toggle.clone() else {
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().read_settings();
        });
        toggle.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// The drop element an event came from, with its round id
    fn drop_target(event: &web_sys::Event) -> Option<(Element, DropId)> {
        let target = event.target()?.dyn_into::<Element>().ok()?;
        let drop = target.closest(".water-drop").ok()??;
        let id = drop.get_attribute("data-id")?.parse().ok()?;
        Some((drop, id))
    }

    /// One delegated listener per input kind on the play area, shared by all drops
    fn setup_drop_input(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let container = game.borrow().el.container.clone();

        // Tap/click to catch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some((drop, id)) = drop_target(&event) else {
                    return;
                };
                event.prevent_default();
                let result = game.borrow_mut().round.catch_drop(id);
                match result {
                    Ok(_) => drop.remove(),
                    Err(err) => log_rejected(&err),
                }
                pump(&game);
            });
            container
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Fell out of the play area (container flashes bubble here too)
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some((drop, id)) = drop_target(&event) else {
                return;
            };
            let result = game.borrow_mut().round.expire_drop(id);
            if let Err(err) = result {
                log_rejected(&err);
            }
            drop.remove();
            pump(&game);
        });
        container.add_event_listener_with_callback("animationend", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        pump(&game);
        request_animation_frame(game);
    }

    /// Render everything the round queued since the last pump
    fn pump(game: &Rc<RefCell<Game>>) {
        let events = game.borrow_mut().round.drain_events();
        for event in events {
            if let Err(err) = render_event(game, &event) {
                log::warn!("Failed to render {:?}: {:?}", event, err);
            }
        }
    }

    fn render_event(game: &Rc<RefCell<Game>>, event: &GameEvent) -> Result<(), JsValue> {
        let g = game.borrow();
        if let Some(effect) = SoundEffect::for_event(event) {
            g.audio.play(effect);
        }

        match event {
            GameEvent::RoundStarted { difficulty, .. } => {
                g.el.message.set_text_content(Some(""));
                clear_children(&g.el.confetti);
                g.el.start_btn.set_text_content(Some("Reset"));
                g.el.start_btn.set_attribute("aria-pressed", "true")?;
                g.el.difficulty.set_disabled(true);
                log::info!("Round started ({})", difficulty);
            }
            GameEvent::ScoreChanged { score } => {
                g.el.score.set_text_content(Some(&score.to_string()));
            }
            GameEvent::TimeChanged { seconds_left } => {
                g.el.time.set_text_content(Some(&seconds_left.to_string()));
            }
            GameEvent::DropsCleared => {
                let drops = g.el.container.get_elements_by_class_name("water-drop");
                while let Some(node) = drops.item(0) {
                    node.remove();
                }
            }
            GameEvent::DropMissed { id } => {
                log::debug!("Missed drop {}", id);
            }
            GameEvent::CatchFeedback { kind } => {
                if g.settings.effective_feedback_motion() {
                    match kind {
                        DropKind::Good => flash(&g.el.container, "flash-green")?,
                        DropKind::Bad => {
                            flash(&g.el.container, "shake")?;
                            flash(&g.el.container, "flash-red")?;
                        }
                    }
                }
            }
            GameEvent::Milestone { message } => {
                g.el.message.set_text_content(Some(*message));
            }
            GameEvent::DifficultyRamped { knobs } => {
                log::debug!("Ramp: {:?}", knobs);
            }
            GameEvent::RoundEnded {
                outcome,
                final_score,
            } => {
                let text = match outcome {
                    Outcome::Won => format!("You did it! Score {}.", final_score),
                    Outcome::Lost => format!("Time! Final score {}. Try again?", final_score),
                };
                g.el.message.set_text_content(Some(&text));
                g.el.start_btn.set_text_content(Some("Start Game"));
                g.el.start_btn.set_attribute("aria-pressed", "false")?;
                g.el.difficulty.set_disabled(false);
            }
            GameEvent::DropCreated { drop } => create_drop_element(&g, drop)?,
            GameEvent::Celebrate => {
                if !g.settings.reduced_motion {
                    celebrate(&g.document, &g.el.confetti)?;
                }
            }
        }
        Ok(())
    }

    fn create_drop_element(g: &Game, drop: &WaterDrop) -> Result<(), JsValue> {
        let el: HtmlElement = g.document.create_element("div")?.dyn_into()?;
        let fall_distance = g.round.play_area().fall_distance(drop.size);

        el.class_list().add_2("water-drop", drop.kind.as_str())?;
        el.set_attribute("data-type", drop.kind.as_str())?;
        el.set_attribute("data-id", &drop.id.to_string())?;

        let style = el.style();
        style.set_property("width", &format!("{}px", drop.size))?;
        style.set_property("height", &format!("{}px", drop.size))?;
        style.set_property("left", &format!("{}px", drop.x))?;
        style.set_property("animation-duration", &format!("{}ms", drop.fall_duration_ms))?;
        style.set_property("--fall-distance", &format!("{}px", fall_distance))?;
        style.set_property("--start-offset", &format!("{}px", drop.size))?;

        g.el.container.append_child(&el)?;
        Ok(())
    }

    /// Restart a one-shot CSS class animation on an element
    fn flash(el: &HtmlElement, class: &str) -> Result<(), JsValue> {
        let classes = el.class_list();
        classes.remove_1(class)?;
        // Force reflow so re-adding the class restarts the animation
        let _ = el.offset_width();
        classes.add_1(class)?;

        let class = class.to_string();
        let target = el.clone();
        let cb = Closure::once_into_js(move || {
            let _ = target.class_list().remove_1(&class);
        });
        if let Some(window) = web_sys::window() {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.unchecked_ref(),
                FEEDBACK_MS,
            )?;
        }
        Ok(())
    }

    fn clear_children(el: &Element) {
        while let Some(child) = el.first_element_child() {
            child.remove();
        }
    }

    /// Confetti burst across the viewport
    fn celebrate(document: &Document, layer: &Element) -> Result<(), JsValue> {
        let Some(window) = web_sys::window() else {
            return Ok(());
        };
        for _ in 0..CONFETTI_COUNT {
            let bit: HtmlElement = document.create_element("div")?.dyn_into()?;
            bit.set_class_name("confetti-bit");

            let left = js_sys::Math::random() * 100.0;
            let delay = js_sys::Math::random() * 300.0;
            let scale = 0.8 + js_sys::Math::random() * 0.8;
            let color = CONFETTI_COLORS
                [(js_sys::Math::random() * CONFETTI_COLORS.len() as f64) as usize
                    % CONFETTI_COLORS.len()];

            let style = bit.style();
            style.set_property("left", &format!("{left}vw"))?;
            style.set_property("top", "-10vh")?;
            style.set_property(
                "transform",
                &format!("translateY(0) rotate(0) scale({scale})"),
            )?;
            style.set_property("animation-delay", &format!("{delay}ms"))?;
            style.set_property("background", color)?;
            layer.append_child(&bit)?;

            let cb = Closure::once_into_js(move || bit.remove());
            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.unchecked_ref(),
                2000 + delay as i32,
            )?;
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(err) = wasm_game::run() {
        log::error!("Failed to start: {:?}", err);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

/// Headless autoplay: a bot that grabs every good drop after a short reaction
/// delay and lets bad drops fall.
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use drop_catcher::sim::{DropId, DropKind, GameEvent, Millis, Round};
    use drop_catcher::{Result, Settings};

    /// Simulation step (roughly one browser frame)
    const STEP_MS: Millis = 16;
    /// Bot reaction time before tapping a good drop
    const REACTION_MS: Millis = 450;

    /// Usage: `drop-catcher [settings.json] [seed]`
    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::from_json(&std::fs::read_to_string(&path)?)?,
            None => Settings::default(),
        };
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        log::info!("Drop Catcher (native) starting with seed {}", seed);

        let mut round = Round::with_options(seed, settings.round_options());
        round.start_with(settings.difficulty)?;

        // (due time, drop, catch instead of expire)
        let mut pending: Vec<(Millis, DropId, bool)> = Vec::new();
        while round.is_running() {
            round.advance(STEP_MS);
            let now = round.now();

            for event in round.drain_events() {
                report(&event);
                if let GameEvent::DropCreated { drop } = event {
                    match drop.kind {
                        DropKind::Good => pending.push((now + REACTION_MS, drop.id, true)),
                        DropKind::Bad => {
                            pending.push((now + drop.fall_duration_ms as Millis, drop.id, false))
                        }
                    }
                }
            }

            let (due, later): (Vec<_>, Vec<_>) =
                pending.drain(..).partition(|(at, _, _)| *at <= now);
            pending = later;
            for (_, id, catch) in due {
                let result = if catch {
                    round.catch_drop(id)
                } else {
                    round.expire_drop(id)
                };
                if let Err(err) = result {
                    log::debug!("Ignored: {}", err);
                }
            }
            for event in round.drain_events() {
                report(&event);
            }
        }
        Ok(())
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::RoundEnded {
                outcome,
                final_score,
            } => println!("Round over: {:?} with {} points", outcome, final_score),
            GameEvent::Milestone { message } => println!("{}", message),
            _ => {}
        }
        if let Ok(json) = serde_json::to_string(event) {
            log::debug!("{}", json);
        }
    }
}
