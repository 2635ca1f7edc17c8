//! Interface de linha de comando do roomreel baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, describe, search,
//! resources, status) e flags globais (--config, --max-attempts, --timeout,
//! --verbose).

use clap::{Parser, Subcommand};

/// roomreel: vídeos narrados por avatar a partir de descrições de cômodos.
#[derive(Debug, Parser)]
#[command(name = "roomreel", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: roomreel.toml).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Número máximo de tentativas de renderização por cômodo.
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Janela de polling da primeira tentativa, em segundos.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Processa os cômodos configurados e gera um vídeo para cada um.
    Run {
        /// Arquivo TOML com uma lista `[[rooms]]` que substitui a da configuração.
        #[arg(long)]
        file: Option<String>,
    },

    /// Gera apenas a descrição de um cômodo.
    Describe {
        /// Tipo do cômodo (ex.: "living room").
        room_type: String,

        /// Características do cômodo.
        features: Vec<String>,
    },

    /// Busca vídeos de banco e mostra a melhor resolução de cada um.
    Search {
        query: String,

        /// Quantidade de resultados.
        #[arg(long, default_value_t = 5)]
        count: u32,
    },

    /// Mostra o avatar e a voz que seriam usados.
    Resources,

    /// Consulta o status de um job de renderização.
    Status {
        job_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_run_subcommand() {
        let cli = Cli::parse_from(["roomreel", "run", "--file", "rooms.toml"]);
        match cli.command {
            Command::Run { file } => assert_eq!(file.as_deref(), Some("rooms.toml")),
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_describe_with_features() {
        let cli = Cli::parse_from(["roomreel", "describe", "living room", "spacious", "bright"]);
        match cli.command {
            Command::Describe {
                room_type,
                features,
            } => {
                assert_eq!(room_type, "living room");
                assert_eq!(features, vec!["spacious", "bright"]);
            }
            _ => panic!("expected Describe command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "roomreel",
            "--max-attempts",
            "5",
            "--timeout",
            "600",
            "--verbose",
            "resources",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.max_attempts, Some(5));
        assert_eq!(cli.timeout, Some(600));
        assert!(matches!(cli.command, Command::Resources));
    }

    #[test]
    fn cli_search_default_count() {
        let cli = Cli::parse_from(["roomreel", "search", "luxury kitchen"]);
        match cli.command {
            Command::Search { query, count } => {
                assert_eq!(query, "luxury kitchen");
                assert_eq!(count, 5);
            }
            _ => panic!("expected Search command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
