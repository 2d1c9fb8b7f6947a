use super::{NeuroVisionApp, QueueAction, Workspace};
use crate::dashboard::{Page, Role};
use crate::upload::{UnitOfWork, UnitStatus, ACCEPTED_EXTENSIONS};
use crate::utils::file_size::FileSizeUtils;
use crate::utils::palette;
use eframe::egui::{self, Align, Color32, RichText};
use std::time::Duration;

const TOAST_TTL: Duration = Duration::from_secs(5);

impl NeuroVisionApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        if self.workspace.is_some() {
            self.render_workspace(ctx);
        } else {
            self.render_sign_in(ctx);
        }
        self.render_toasts(ctx);
    }

    fn render_sign_in(&mut self, ctx: &egui::Context) {
        let mut submitted = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(40.0);
            ui.vertical_centered(|ui| {
                ui.heading("NeuroVision Assist");
                ui.add_space(5.0);
                ui.label(
                    RichText::new("AI-assisted MRI analysis for your care team")
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            });
            ui.add_space(20.0);

            let form = &mut self.sign_in;
            ui.group(|ui| {
                ui.label("Full name");
                ui.add(egui::TextEdit::singleline(&mut form.full_name).hint_text("Dr. Jane Smith"));
                ui.add_space(8.0);
                ui.label("Email");
                ui.add(egui::TextEdit::singleline(&mut form.email).hint_text("doctor@hospital.com"));
                ui.add_space(8.0);
                egui::ComboBox::from_label("Your Role")
                    .selected_text(
                        form.role
                            .map(|r| r.display_name())
                            .unwrap_or("Select your medical role"),
                    )
                    .show_ui(ui, |ui| {
                        for role in Role::ALL {
                            ui.selectable_value(&mut form.role, Some(role), role.display_name());
                        }
                    });
            });

            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                let button = egui::Button::new("Sign In").min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    submitted = form.submit();
                }
                if let Some(error) = &form.error_message {
                    ui.add_space(5.0);
                    ui.colored_label(palette::DANGER, error);
                }
            });
        });

        if let Some(profile) = submitted {
            self.sign_in_as(profile);
        }
    }

    fn render_workspace(&mut self, ctx: &egui::Context) {
        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };

        let mut sign_out = false;
        egui::SidePanel::left("navigation")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.add_space(10.0);
                ui.heading("🧠 NeuroVision");
                ui.add_space(10.0);
                ui.label(RichText::new(&workspace.profile.full_name).strong());
                badge(ui, workspace.profile.role.display_name(), palette::role_color(workspace.profile.role));
                ui.label(
                    RichText::new(&workspace.profile.email)
                        .small()
                        .color(palette::MUTED),
                );
                ui.separator();

                for item in workspace.profile.role.menu() {
                    if ui
                        .selectable_label(workspace.page == item.page, item.title)
                        .clicked()
                    {
                        workspace.navigate(item.page);
                    }
                }

                ui.with_layout(egui::Layout::bottom_up(Align::Min), |ui| {
                    ui.add_space(10.0);
                    if ui.button("⎋ Sign Out").clicked() {
                        sign_out = true;
                    }
                });
            });

        let mut pick_files = false;
        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 30.0;
            egui::ScrollArea::vertical()
                .max_height(total_height - footer_height)
                .show(ui, |ui| match workspace.page {
                    Page::Dashboard => render_dashboard(ui, workspace),
                    Page::Upload => {
                        pick_files = render_upload(ui, ctx, workspace, &mut actions);
                    }
                    Page::Placeholder(route) => {
                        ui.add_space(20.0);
                        ui.heading(route.trim_start_matches('/'));
                        ui.label("This section is not available yet.");
                    }
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                render_footer(ui, workspace);
            });
        });

        if sign_out {
            self.sign_out();
            return;
        }
        if pick_files {
            self.pick_files();
        }
        for action in actions {
            self.handle_queue_action(action);
        }
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        let recent = self.notifications.recent(TOAST_TTL);
        if recent.is_empty() {
            return;
        }
        ctx.request_repaint_after(Duration::from_millis(500));

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in recent.iter().rev().take(4) {
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.0, palette::severity_color(toast.severity)))
                        .show(ui, |ui| {
                            ui.set_max_width(280.0);
                            ui.label(RichText::new(&toast.title).strong());
                            ui.label(&toast.description);
                        });
                    ui.add_space(6.0);
                }
            });
    }
}

fn badge(ui: &mut egui::Ui, text: &str, fill: Color32) {
    egui::Frame::none()
        .fill(fill)
        .rounding(4.0)
        .inner_margin(egui::Margin::symmetric(6.0, 2.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(Color32::WHITE));
        });
}

fn render_dashboard(ui: &mut egui::Ui, workspace: &Workspace) {
    ui.add_space(20.0);
    ui.heading(format!("Welcome back, {}!", workspace.profile.full_name));
    ui.label(
        RichText::new(format!(
            "Here's an overview of your {} dashboard and recent activity.",
            workspace.profile.role
        ))
        .color(palette::MUTED),
    );
    ui.add_space(20.0);

    let cards = workspace.stats.cards();
    ui.columns(cards.len().max(1), |columns| {
        for (column, card) in columns.iter_mut().zip(cards) {
            column.group(|ui| {
                ui.label(RichText::new(card.title).small().color(palette::MUTED));
                ui.label(RichText::new(&card.value).size(26.0).strong());
                let color = if card.change.starts_with('+') {
                    palette::SUCCESS
                } else if card.change.starts_with('-') {
                    palette::DANGER
                } else {
                    palette::MUTED
                };
                ui.colored_label(color, format!("{} from yesterday", card.change));
            });
        }
    });
}

/// Returns whether "Select Files" was clicked.
fn render_upload(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    workspace: &mut Workspace,
    actions: &mut Vec<QueueAction>,
) -> bool {
    let mut pick_files = false;
    ui.add_space(20.0);
    ui.heading("MRI Scan Analysis");
    ui.label(
        RichText::new("Upload MRI scans for AI-powered tumor detection and segmentation.")
            .color(palette::MUTED),
    );
    ui.add_space(10.0);

    let formats = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ");
    let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
    let stroke_color = if hovering {
        palette::ACCENT
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke.color
    };

    egui::Frame::none()
        .stroke(egui::Stroke::new(2.0, stroke_color))
        .rounding(8.0)
        .inner_margin(24.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Drop your MRI files here").size(18.0));
                ui.label(RichText::new("or click to browse your computer").color(palette::MUTED));
                ui.add_space(8.0);
                if ui.button("📁 Select Files").clicked() {
                    pick_files = true;
                }
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Supported formats: {}", formats))
                        .small()
                        .color(palette::MUTED),
                );
            });
        });

    if workspace.session.units().is_empty() {
        return pick_files;
    }

    ui.add_space(20.0);
    ui.group(|ui| {
        ui.label(RichText::new("Processing Queue").strong());
        let summary = workspace.session.summary();
        let progress_bar = egui::ProgressBar::new(summary.finished_fraction())
            .show_percentage()
            .animate(summary.in_flight() > 0)
            .fill(palette::ACCENT);
        ui.add(progress_bar);
        ui.label(summary.status_text());
    });

    ui.add_space(10.0);
    render_details(ui, workspace, actions);
    pick_files
}

fn render_details(ui: &mut egui::Ui, workspace: &mut Workspace, actions: &mut Vec<QueueAction>) {
    if ui
        .button(if workspace.show_details {
            "Hide Details"
        } else {
            "Show Details"
        })
        .clicked()
    {
        workspace.show_details = !workspace.show_details;
    }

    if !workspace.show_details {
        return;
    }

    for unit in workspace.session.units() {
        ui.add_space(6.0);
        egui::Frame::none()
            .fill(ui.style().visuals.extreme_bg_color)
            .rounding(6.0)
            .inner_margin(10.0)
            .show(ui, |ui| render_unit(ui, unit, actions));
    }
}

fn render_unit(ui: &mut egui::Ui, unit: &UnitOfWork, actions: &mut Vec<QueueAction>) {
    let status = unit.status();
    ui.horizontal(|ui| {
        match status {
            UnitStatus::Uploading | UnitStatus::Processing => {
                ui.spinner();
            }
            UnitStatus::Completed => {
                ui.colored_label(palette::SUCCESS, "✅");
            }
            UnitStatus::Errored => {
                ui.colored_label(palette::DANGER, "❌");
            }
        }
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(unit.name()).strong());
                ui.label(RichText::new(format!(".{}", unit.extension())).small().monospace());
            });
            ui.label(
                RichText::new(format!(
                    "{} • {}",
                    FileSizeUtils::format_size(unit.size_bytes()),
                    status.label()
                ))
                .small()
                .color(palette::MUTED),
            );
        });

        ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
            if ui.button("✖").on_hover_text("Remove").clicked() {
                actions.push(QueueAction::Remove(unit.id()));
            }
            if unit.result().is_some() {
                if ui.button("⬇").on_hover_text("Download report").clicked() {
                    actions.push(QueueAction::Download(unit.id()));
                }
                if ui.button("👁").on_hover_text("View scan").clicked() {
                    actions.push(QueueAction::View(unit.id()));
                }
            }
        });
    });

    ui.add(egui::ProgressBar::new(unit.progress() / 100.0).fill(palette::status_color(status)));

    if let Some(result) = unit.result() {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("🧠 Analysis Results").strong());
            badge(
                ui,
                result.classification.label(),
                palette::classification_color(result.classification),
            );
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new("Confidence:").color(palette::MUTED));
            ui.label(RichText::new(format!("{:.1}%", result.confidence_score)).strong());
            ui.add_space(16.0);
            ui.label(RichText::new("Segmentation:").color(palette::MUTED));
            ui.label(
                RichText::new(if result.has_segmentation {
                    "Available"
                } else {
                    "N/A"
                })
                .strong(),
            );
        });
    }

    if let Some(reason) = unit.error() {
        ui.colored_label(palette::DANGER, reason);
    }
}

fn render_footer(ui: &mut egui::Ui, workspace: &Workspace) {
    ui.add_space(5.0);
    if let Some(error) = &workspace.error_message {
        ui.colored_label(palette::DANGER, error);
    } else {
        ui.label(
            RichText::new("Simulated analysis. Not for diagnostic use.")
                .small()
                .color(palette::MUTED),
        );
    }
}
