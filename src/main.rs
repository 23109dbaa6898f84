//! Prize wheel entry point
//!
//! Wires the wheel to the page on the web; runs a headless spin natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement};

    use prize_wheel::checkout::{AmountInput, CheckoutResponse, ErrorBody, validate_amount};
    use prize_wheel::effects::{audio_from_settings, celebration_from_settings};
    use prize_wheel::platform::{Clock, PerformanceClock, RafScheduler};
    use prize_wheel::renderer::{CanvasPainter, render};
    use prize_wheel::wheel::{FrameStatus, SpinDriver, Wheel, WheelEvent};
    use prize_wheel::{SpinError, WheelSettings};

    const INVALID_AMOUNT_TEXT: &str = "Please enter a valid amount.";

    /// Page elements the wheel drives
    struct Ui {
        painter: CanvasPainter,
        spin_btn: HtmlButtonElement,
        status: Element,
        result: Element,
        chips: Element,
        err: Option<Element>,
        /// Present only when the wheel shows generated amounts
        regen_btn: Option<HtmlButtonElement>,
        label_max_chars: usize,
    }

    impl Ui {
        fn paint(&self, wheel: &Wheel) {
            let viewport = self.painter.measure();
            self.painter.resize(&viewport);
            let commands = render(
                wheel.rotation(),
                wheel.outcomes(),
                &viewport,
                self.label_max_chars,
            );
            if let Err(e) = self.painter.paint(&commands) {
                log::warn!("Paint failed: {:?}", e);
            }
        }

        /// Status line and spin button from gate state
        fn refresh(&self, wheel: &Wheel) {
            self.status.set_text_content(Some(wheel.status_text()));
            let can_spin = wheel.can_spin();
            self.spin_btn.set_disabled(!can_spin);
            let classes = self.spin_btn.class_list();
            let _ = if can_spin {
                classes.remove_1("ghost")
            } else {
                classes.add_1("ghost")
            };
            if let Some(btn) = &self.regen_btn {
                btn.set_disabled(!wheel.can_regenerate());
            }
        }

        fn apply_events(&self, wheel: &mut Wheel) {
            for event in wheel.drain_events() {
                match event {
                    WheelEvent::Result(outcome) => {
                        self.result.set_text_content(Some(&outcome.label));
                    }
                    WheelEvent::OutcomesChanged { count, clamped } => {
                        self.render_chips(wheel);
                        if clamped {
                            self.show_error(&format!("Outcome count adjusted to {}.", count));
                        }
                    }
                    WheelEvent::Unlocked | WheelEvent::Locked | WheelEvent::SpinStarted { .. } => {}
                    WheelEvent::Tick => {}
                }
            }
            self.refresh(wheel);
        }

        fn render_chips(&self, wheel: &Wheel) {
            self.chips.set_inner_html("");
            let Some(document) = self.chips.owner_document() else {
                return;
            };
            for outcome in wheel.outcomes() {
                if let Ok(el) = document.create_element("span") {
                    el.set_class_name("chip");
                    el.set_text_content(Some(outcome.short_label()));
                    let _ = self.chips.append_child(&el);
                }
            }
        }

        fn show_error(&self, msg: &str) {
            if let Some(err) = &self.err {
                err.set_text_content(Some(msg));
            }
        }
    }

    struct App {
        ui: Rc<Ui>,
        driver: SpinDriver,
        clock: PerformanceClock,
        settings: WheelSettings,
    }

    impl App {
        fn wheel(&self) -> &Rc<RefCell<Wheel>> {
            self.driver.wheel()
        }

        fn spin(&self) {
            self.ui.show_error("");
            match self.driver.start(self.clock.now_ms()) {
                Ok(index) => log::debug!("Spin started toward slice {}", index),
                Err(SpinError::GateClosed) => log::debug!("Spin ignored: gate closed"),
                Err(e) => {
                    log::warn!("{}", e);
                    self.ui.show_error(&e.to_string());
                }
            }
            let mut wheel = self.wheel().borrow_mut();
            self.ui.apply_events(&mut wheel);
        }

        /// Fresh amounts between rounds
        fn regenerate(&self) {
            let Some((config, requested)) = self.settings.outcomes.amounts() else {
                return;
            };
            self.ui.show_error("");
            let mut wheel = self.wheel().borrow_mut();
            if let Err(e) = wheel.regenerate(&config, requested) {
                log::warn!("{}", e);
                self.ui.show_error(&e.to_string());
            }
            self.ui.paint(&wheel);
            self.ui.apply_events(&mut wheel);
        }

        /// Inbound signal from a completed payment
        fn unlock(&self) {
            let mut wheel = self.wheel().borrow_mut();
            wheel.unlock();
            self.ui.apply_events(&mut wheel);
        }
    }

    fn element(document: &Document, id: &str) -> Element {
        document
            .get_element_by_id(id)
            .unwrap_or_else(|| panic!("missing #{}", id))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Prize wheel starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = element(&document, "wheelCanvas")
            .dyn_into()
            .expect("not a canvas");
        let painter = CanvasPainter::new(canvas).expect("no 2d context");

        let settings = WheelSettings::load();
        let seed = js_sys::Date::now() as u64;
        let wheel = match Wheel::from_settings(&settings, seed) {
            Ok(wheel) => wheel,
            Err(e) => {
                log::error!("{}; falling back to curated outcomes", e);
                Wheel::from_settings(&WheelSettings::default(), seed).expect("default settings")
            }
        }
        .with_audio(audio_from_settings(&settings))
        .with_celebration(celebration_from_settings(&settings));
        log::info!("Wheel ready with {} outcomes (seed {})", wheel.outcomes().len(), seed);

        let ui = Rc::new(Ui {
            painter,
            spin_btn: element(&document, "spinBtn")
                .dyn_into()
                .expect("spinBtn is not a button"),
            status: element(&document, "spinStatus"),
            result: element(&document, "resultText"),
            chips: element(&document, "chips"),
            err: document.get_element_by_id("errText"),
            regen_btn: document
                .get_element_by_id("regenBtn")
                .filter(|_| settings.outcomes.amounts().is_some())
                .and_then(|el| el.dyn_into().ok()),
            label_max_chars: settings.label_max_chars,
        });

        let frame_ui = ui.clone();
        let driver = SpinDriver::new(
            Rc::new(RefCell::new(wheel)),
            Rc::new(RafScheduler),
            Box::new(move |wheel: &mut Wheel, status: &FrameStatus| {
                frame_ui.paint(wheel);
                if matches!(status, FrameStatus::Finished(_)) {
                    frame_ui.apply_events(wheel);
                }
            }),
        );

        let app = Rc::new(App {
            ui,
            driver,
            clock: PerformanceClock::new(),
            settings,
        });

        {
            let mut wheel = app.wheel().borrow_mut();
            app.ui.render_chips(&wheel);
            app.ui.paint(&wheel);
            app.ui.apply_events(&mut wheel);
        }

        setup_spin_button(&document, app.clone());
        setup_pay_button(&document, app.clone());
        setup_regenerate_button(app.clone());
        setup_unlock_hook(&window, app.clone());
        setup_resize(&window, app);

        log::info!("Prize wheel running!");
    }

    fn setup_spin_button(document: &Document, app: Rc<App>) {
        let btn = element(document, "spinBtn");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.spin();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_regenerate_button(app: Rc<App>) {
        let Some(btn) = app.ui.regen_btn.clone() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.regenerate();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_pay_button(document: &Document, app: Rc<App>) {
        let btn = element(document, "payBtn");
        let input: HtmlInputElement = element(document, "amountInput")
            .dyn_into()
            .expect("amountInput is not an input");

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.ui.show_error("");
            let amount = AmountInput::Text(input.value());
            if validate_amount(Some(&amount)).is_err() {
                app.ui.show_error(INVALID_AMOUNT_TEXT);
                return;
            }
            let Some(value) = amount.as_f64() else {
                return;
            };

            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request_checkout(&app.settings.checkout_endpoint, value).await {
                    Ok(client_secret) => {
                        log::info!("Checkout session ready");
                        if let Err(e) = announce_session(&client_secret) {
                            log::error!("Could not hand off checkout session: {:?}", e);
                        }
                    }
                    Err(msg) => {
                        log::warn!("Checkout failed: {}", msg);
                        app.ui.show_error(&msg);
                    }
                }
            });
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// POST the amount; returns the client secret or a displayable error
    async fn request_checkout(endpoint: &str, amount: f64) -> Result<String, String> {
        let window = web_sys::window().ok_or("no window")?;

        let opts = web_sys::RequestInit::new();
        opts.set_method("POST");
        let body = serde_json::json!({ "amount": amount }).to_string();
        opts.set_body(&JsValue::from_str(&body));

        let request = web_sys::Request::new_with_str_and_init(endpoint, &opts)
            .map_err(|e| format!("{:?}", e))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| format!("{:?}", e))?;

        let resp: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|_| "Network error".to_string())?
            .dyn_into()
            .map_err(|_| "Unexpected response".to_string())?;

        let json = JsFuture::from(resp.json().map_err(|e| format!("{:?}", e))?)
            .await
            .map_err(|_| "Malformed response".to_string())?;
        let text: String = js_sys::JSON::stringify(&json)
            .map(String::from)
            .map_err(|_| "Malformed response".to_string())?;

        if resp.ok() {
            serde_json::from_str::<CheckoutResponse>(&text)
                .map(|r| r.client_secret)
                .map_err(|e| e.to_string())
        } else {
            Err(serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("Checkout failed ({})", resp.status())))
        }
    }

    /// Hand the client secret to the page's embedded checkout. The page calls
    /// `window.unlockSpin()` once payment succeeds.
    fn announce_session(client_secret: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let detail = js_sys::Object::new();
        js_sys::Reflect::set(&detail, &"clientSecret".into(), &JsValue::from_str(client_secret))?;

        let init = web_sys::CustomEventInit::new();
        init.set_detail(&detail);
        let event = web_sys::CustomEvent::new_with_event_init_dict("checkout-session", &init)?;
        window.dispatch_event(&event)?;
        Ok(())
    }

    fn setup_unlock_hook(window: &web_sys::Window, app: Rc<App>) {
        let closure = Closure::<dyn FnMut()>::new(move || {
            log::info!("Payment confirmed - unlocking spin");
            app.unlock();
        });
        if let Err(e) = js_sys::Reflect::set(window, &"unlockSpin".into(), closure.as_ref()) {
            log::error!("Could not install unlockSpin: {:?}", e);
        }
        closure.forget();
    }

    fn setup_resize(window: &web_sys::Window, app: Rc<App>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            // Mid-spin frames repaint on their own
            if let Ok(wheel) = app.wheel().try_borrow() {
                app.ui.paint(&wheel);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Prize wheel (native) starting...");
    log::info!("Native mode runs a headless spin - serve the wasm build for the page");

    run_headless_spin();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Pay, unlock and spin once against a manual clock
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_spin() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use prize_wheel::checkout::{
        PaymentResult, PaymentSessionService, SessionParams, handle_checkout, settle_payment,
    };
    use prize_wheel::platform::{Clock, ManualClock, ManualScheduler};
    use prize_wheel::renderer::{Viewport, render};
    use prize_wheel::wheel::{FrameStatus, SpinDriver, Wheel};
    use prize_wheel::{CheckoutError, WheelSettings};

    /// Accepts every session
    struct OfflineProvider;

    impl PaymentSessionService for OfflineProvider {
        fn create_session(&self, params: &SessionParams) -> Result<String, CheckoutError> {
            Ok(format!("offline_{}", params.unit_amount()))
        }
    }

    let settings = WheelSettings::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let wheel = match Wheel::from_settings(&settings, seed) {
        Ok(wheel) => Rc::new(RefCell::new(wheel)),
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    let (status, body) = handle_checkout("POST", r#"{"amount": 10}"#, "http://localhost", &OfflineProvider);
    log::info!("Checkout -> {} {}", status, body);
    let result = if status == 200 {
        PaymentResult::Succeeded
    } else {
        PaymentResult::Failed
    };
    settle_payment(result, &mut wheel.borrow_mut());

    let scheduler = Rc::new(ManualScheduler::new());
    let viewport = Viewport::default();
    let label_max_chars = settings.label_max_chars;
    let driver = SpinDriver::new(
        wheel.clone(),
        scheduler.clone(),
        Box::new(move |wheel: &mut Wheel, status: &FrameStatus| {
            let commands = render(wheel.rotation(), wheel.outcomes(), &viewport, label_max_chars);
            log::debug!("Frame: {:.3} rad, {} draw commands", wheel.rotation(), commands.len());
            if let FrameStatus::Finished(outcome) = status {
                log::info!("Landed on slice {}", outcome.id);
            }
        }),
    );

    let clock = ManualClock::new(0.0);
    if let Err(e) = driver.start(clock.now_ms()) {
        log::error!("{}", e);
        return;
    }
    while scheduler.pending() > 0 {
        clock.advance(1000.0 / 60.0);
        scheduler.fire(clock.now_ms());
    }

    let wheel = wheel.borrow();
    match wheel.last_result() {
        Some(outcome) => println!("Result: {}", outcome.label),
        None => println!("No result"),
    }
    println!("{}", wheel.status_text());
}
