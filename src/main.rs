use eframe::egui::{Button, Color32, ComboBox, RichText, ScrollArea, Slider, TextEdit, Ui};
use eframe::{Frame, egui};
use playground::llm::dummy::DummyLLMBuilder;
use playground::llm::openai::OpenAiLLMBuilder;
use playground::llm::{LLM, LLMBuilder};
use playground::*;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

fn main() {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config_path = AppConfig::default_path();
    let cfg = AppConfig::load(&config_path)
        .unwrap_or_else(|e| fatal(format!("{}: {}", config_path.display(), e)));

    match cfg.backend.kind {
        BackendKind::OpenAi => start(OpenAiLLMBuilder, cfg),
        BackendKind::Dummy => start(DummyLLMBuilder, cfg),
    }
}

fn fatal(msg: impl Display) -> ! {
    log::error!("{}", msg);
    std::process::exit(1)
}

fn start<B>(builder: B, cfg: AppConfig)
where
    B: LLMBuilder,
    B::Built: Send + Sync + 'static,
{
    let llm = builder
        .build(&cfg.backend)
        .unwrap_or_else(|e| fatal(format!("Cannot create LLM session: {}", e)));
    let runtime = tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| fatal(format!("Cannot start async runtime: {}", e)));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 640.0]),
        ..Default::default()
    };

    let (tx, rx) = std::sync::mpsc::channel();
    eframe::run_native(
        "Playground Mode",
        options,
        Box::new(|_cc| {
            Ok(Box::new(PlaygroundGui {
                llm: Arc::new(llm),
                defaults: cfg.default_settings,
                runtime,
                form: FormState::default(),
                tx,
                rx,
                run: RunState::default(),
            }))
        }),
    )
    .expect("eframe/egui run failed");
}

struct EguiWidgets<'a> {
    ui: &'a mut Ui,
    form: &'a mut FormState,
}

impl Widgets for EguiWidgets<'_> {
    fn checkbox(&mut self, label: &str, default: bool) -> bool {
        let value = self.form.flag(label, default);
        self.ui.checkbox(value, label);
        *value
    }

    fn select(&mut self, label: &str, options: &[String]) -> String {
        let value = self.form.choice(label, options);
        ComboBox::from_label(label)
            .selected_text(value.as_str())
            .show_ui(self.ui, |ui| {
                for option in options {
                    ui.selectable_value(value, option.clone(), option.as_str());
                }
            });
        value.clone()
    }

    fn slider_f32(&mut self, label: &str, range: RangeInclusive<f32>, default: f32) -> f32 {
        let value = self.form.float(label, range.clone(), default);
        self.ui.add(Slider::new(value, range).text(label));
        *value
    }

    fn slider_u32(&mut self, label: &str, range: RangeInclusive<u32>, default: u32) -> u32 {
        let value = self.form.int(label, range.clone(), default);
        self.ui.add(Slider::new(value, range).text(label));
        *value
    }

    fn text_area(&mut self, label: &str, placeholder: &str) -> String {
        let value = self.form.text(label);
        self.ui.label(label);
        self.ui.add(
            TextEdit::multiline(value)
                .hint_text(placeholder)
                .desired_width(f32::INFINITY),
        );
        value.clone()
    }

    fn text_input(&mut self, label: &str, placeholder: &str) -> String {
        let value = self.form.text(label);
        self.ui.horizontal(|ui| {
            let label = ui.label(label);
            ui.add(
                TextEdit::singleline(value)
                    .hint_text(placeholder)
                    .desired_width(f32::INFINITY),
            )
            .labelled_by(label.id);
        });
        value.clone()
    }
}

struct PlaygroundGui<L> {
    llm: Arc<L>,
    defaults: DefaultsTable,
    runtime: tokio::runtime::Runtime,
    form: FormState,
    tx: Sender<(Functionality, DispatchStatus)>,
    rx: Receiver<(Functionality, DispatchStatus)>,
    run: RunState,
}

impl<L> eframe::App for PlaygroundGui<L>
where
    L: LLM + Send + Sync + 'static,
{
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Playground Mode");

            if let Ok((functionality, status)) = self.rx.try_recv() {
                self.run.finish(functionality, status);
            }

            let mut selection = self.run.selection();
            ComboBox::from_label("Choose functionality:")
                .selected_text(selection.map_or(Functionality::UNSELECTED_LABEL, Functionality::label))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selection, None, Functionality::UNSELECTED_LABEL);
                    for functionality in Functionality::ALL {
                        ui.selectable_value(&mut selection, Some(functionality), functionality.label());
                    }
                });
            self.run.select(selection);

            let Some(functionality) = selection else {
                return;
            };

            ScrollArea::vertical().show(ui, |ui| {
                let (settings, input) = {
                    let mut widgets = EguiWidgets {
                        ui: &mut *ui,
                        form: &mut self.form,
                    };
                    let settings = resolve_settings(functionality, &self.defaults, &mut widgets);
                    let input = collect_input(functionality, &mut widgets);
                    (settings, input)
                };

                ui.separator();

                let btn = ui.add_enabled(
                    !self.run.is_running(),
                    Button::new(functionality.run_label()),
                );
                if btn.clicked() && self.run.start(functionality) {
                    self.start_dispatch(ctx, functionality, input, settings);
                }

                self.show_status(ui);
            });
        });
    }
}

impl<L> PlaygroundGui<L>
where
    L: LLM + Send + Sync + 'static,
{
    fn start_dispatch(
        &mut self,
        ctx: &egui::Context,
        functionality: Functionality,
        input: Input,
        settings: Settings,
    ) {
        let llm = Arc::clone(&self.llm);
        let runtime = self.runtime.handle().clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let dispatch_res = panic::catch_unwind(AssertUnwindSafe(|| {
                runtime.block_on(dispatch(llm.as_ref(), functionality, &input, &settings))
            }));
            let status = dispatch_res.unwrap_or_else(|_| {
                DispatchStatus::ErrorDisplayed("Error: the run crashed".to_owned())
            });
            // Receiver is gone only when the window is closing
            let _ = tx.send((functionality, status));
            ctx.request_repaint();
        });
    }

    fn show_status(&self, ui: &mut Ui) {
        if self.run.is_running() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Running...");
            });
            return;
        }
        match self.run.status() {
            DispatchStatus::Idle | DispatchStatus::Dispatching => {}
            DispatchStatus::Displayed(outcome) => show_outcome(ui, outcome),
            DispatchStatus::ErrorDisplayed(msg) => {
                ui.colored_label(Color32::RED, msg.as_str());
            }
        }
    }
}

fn show_outcome(ui: &mut Ui, outcome: &Outcome) {
    match outcome {
        Outcome::Completion(completion) => {
            ui.label(outcome.title());
            ui.label(RichText::new("Messages:").strong());
            egui::Frame::group(ui.style())
                .fill(Color32::from_rgb(0xdf, 0xf3, 0xe4))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.colored_label(Color32::DARK_GREEN, completion.messages.as_str());
                });
            let usage = ui.small(completion.usage_line());
            if let Some(created) = completion.created {
                usage.on_hover_text(created.to_rfc2822());
            }
        }
        _ => {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(outcome.title()).strong());
                ui.label(outcome.body());
            });
        }
    }
}
