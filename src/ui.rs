//! Interface de terminal do roomreel: spinner por cômodo e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`RunProgress`] acompanha visualmente o
//! processamento dos cômodos no terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::orchestrator::{RoomResult, RoomStatus, RunReport};

/// Indicador visual de progresso para uma execução do pipeline.
///
/// Exibe um spinner animado durante o processamento e mensagens
/// coloridas para sucesso (verde) e falha (vermelho) de cada cômodo.
pub struct RunProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    dim: Style,
}

impl RunProgress {
    /// Inicia o spinner para `total` cômodos.
    pub fn start(total: usize) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Processing {total} room(s)..."));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Imprime o resultado de um cômodo acima do spinner.
    pub fn room_done(&self, result: &RoomResult) {
        match result.status {
            RoomStatus::Success => self.pb.println(format!(
                "  {} {}: {}",
                self.green.apply_to("✓"),
                result.room_type,
                result.video_url.as_deref().unwrap_or("-")
            )),
            RoomStatus::Failed => self.pb.println(format!(
                "  {} {}: {}",
                self.red.apply_to("✗"),
                result.room_type,
                result.error.as_deref().unwrap_or("unknown error")
            )),
        }
    }

    /// Finaliza o spinner e exibe o resumo da execução.
    pub fn finish(&self, report: &RunReport) {
        self.pb.finish_and_clear();
        let ok = report.succeeded();
        let total = report.results.len();
        let style = if ok == total { &self.green } else { &self.red };
        println!();
        println!(
            "{}",
            style.apply_to(format!("─── {ok}/{total} room(s) rendered ───"))
        );
        println!("{}", self.dim.apply_to(format!("run {}", report.run_id)));
    }
}
