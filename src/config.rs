//! Configuração do roomreel carregada a partir de `roomreel.toml`.
//!
//! A struct [`RoomreelConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `PEXELS_API_KEY`, `HEYGEN_API_KEY` e
//! `ANTHROPIC_API_KEY` têm precedência sobre o arquivo.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::PipelineError;
use crate::render::{PollSchedule, RetryPolicy};

/// Nome do arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "roomreel.toml";

/// Um cômodo a ser processado: tipo e lista de características.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomSpec {
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl RoomSpec {
    pub fn new(room_type: &str, features: &[&str]) -> Self {
        Self {
            room_type: room_type.to_string(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Arquivo contendo apenas uma lista `[[rooms]]`.
#[derive(Debug, Deserialize)]
struct RoomsFile {
    rooms: Vec<RoomSpec>,
}

/// Carrega a lista de cômodos de um arquivo TOML separado.
pub fn load_rooms(path: &Path) -> Result<Vec<RoomSpec>, PipelineError> {
    let contents = std::fs::read_to_string(path)?;
    let file: RoomsFile = toml::from_str(&contents)?;
    Ok(file.rooms)
}

/// Configuração de nível superior carregada de `roomreel.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomreelConfig {
    /// Chave da API de busca de vídeos (Pexels).
    #[serde(default)]
    pub pexels_api_key: String,

    /// Chave da API de vídeos com avatar (HeyGen).
    #[serde(default)]
    pub heygen_api_key: String,

    /// Chave do modelo de texto. Vazia = somente o template de fallback.
    #[serde(default)]
    pub text_model_api_key: String,

    #[serde(default = "default_pexels_base_url")]
    pub pexels_base_url: String,

    #[serde(default = "default_heygen_base_url")]
    pub heygen_base_url: String,

    #[serde(default = "default_heygen_upload_url")]
    pub heygen_upload_url: String,

    #[serde(default = "default_text_model_url")]
    pub text_model_url: String,

    /// Identificador do modelo usado para gerar descrições.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Limite máximo de tokens da descrição gerada.
    #[serde(default = "default_description_max_tokens")]
    pub description_max_tokens: u32,

    /// Diretório dos vídeos de fundo baixados.
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,

    /// Diretório dos vídeos renderizados e do relatório.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Quantidade de resultados pedidos à busca de vídeos.
    #[serde(default = "default_search_results")]
    pub search_results: u32,

    /// Máximo de tentativas de renderização por cômodo.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Janela de polling da primeira tentativa, em segundos.
    #[serde(default = "default_initial_timeout_secs")]
    pub initial_timeout_secs: u64,

    /// Redução da janela de polling a cada nova tentativa.
    #[serde(default = "default_timeout_step_secs")]
    pub timeout_step_secs: u64,

    /// Janela mínima de polling.
    #[serde(default = "default_timeout_floor_secs")]
    pub timeout_floor_secs: u64,

    /// Palavras removidas do fim da narração a cada nova tentativa.
    #[serde(default = "default_words_dropped_per_retry")]
    pub words_dropped_per_retry: usize,

    /// Intervalo de polling fora do estado `processing`.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Intervalo de polling enquanto o job está em `processing`.
    #[serde(default = "default_processing_poll_interval_secs")]
    pub processing_poll_interval_secs: u64,

    /// Cômodos processados por `roomreel run`.
    #[serde(default = "default_rooms")]
    pub rooms: Vec<RoomSpec>,
}

fn default_pexels_base_url() -> String {
    "https://api.pexels.com/videos".to_string()
}

fn default_heygen_base_url() -> String {
    "https://api.heygen.com".to_string()
}

fn default_heygen_upload_url() -> String {
    "https://upload.heygen.com".to_string()
}

fn default_text_model_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_text_model() -> String {
    "claude-haiku-4-5-20251001".to_string()
}

fn default_description_max_tokens() -> u32 {
    200
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_search_results() -> u32 {
    1
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_timeout_secs() -> u64 {
    300
}

fn default_timeout_step_secs() -> u64 {
    60
}

fn default_timeout_floor_secs() -> u64 {
    180
}

fn default_words_dropped_per_retry() -> usize {
    50
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_processing_poll_interval_secs() -> u64 {
    10
}

// Conjunto padrão: sala de estar e jardim.
fn default_rooms() -> Vec<RoomSpec> {
    vec![
        RoomSpec::new("living room", &["spacious", "modern", "bright"]),
        RoomSpec::new("garden", &["private", "landscaped", "peaceful"]),
    ]
}

impl Default for RoomreelConfig {
    fn default() -> Self {
        Self {
            pexels_api_key: String::new(),
            heygen_api_key: String::new(),
            text_model_api_key: String::new(),
            pexels_base_url: default_pexels_base_url(),
            heygen_base_url: default_heygen_base_url(),
            heygen_upload_url: default_heygen_upload_url(),
            text_model_url: default_text_model_url(),
            text_model: default_text_model(),
            description_max_tokens: default_description_max_tokens(),
            downloads_dir: default_downloads_dir(),
            output_dir: default_output_dir(),
            search_results: default_search_results(),
            max_attempts: default_max_attempts(),
            initial_timeout_secs: default_initial_timeout_secs(),
            timeout_step_secs: default_timeout_step_secs(),
            timeout_floor_secs: default_timeout_floor_secs(),
            words_dropped_per_retry: default_words_dropped_per_retry(),
            poll_interval_secs: default_poll_interval_secs(),
            processing_poll_interval_secs: default_processing_poll_interval_secs(),
            rooms: default_rooms(),
        }
    }
}

impl RoomreelConfig {
    /// Carrega a configuração de `roomreel.toml` no diretório atual.
    pub fn load() -> Result<Self, PipelineError> {
        Self::load_or_default(Path::new(CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho passado explicitamente.
    /// O arquivo precisa existir.
    pub fn load_from(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::load_or_default(path)
    }

    /// Usa valores padrão se o arquivo não existir.
    fn load_or_default(path: &Path) -> Result<Self, PipelineError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<RoomreelConfig>(&contents)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Variáveis de ambiente têm precedência sobre o arquivo para as chaves de API.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let overrides: [(&str, &mut String); 3] = [
            ("PEXELS_API_KEY", &mut self.pexels_api_key),
            ("HEYGEN_API_KEY", &mut self.heygen_api_key),
            ("ANTHROPIC_API_KEY", &mut self.text_model_api_key),
        ];
        for (name, field) in overrides {
            if let Some(value) = lookup(name)
                && !value.is_empty()
            {
                *field = value;
            }
        }
    }

    /// Verifica se a configuração permite executar o pipeline completo.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.pexels_api_key.is_empty() {
            return Err(PipelineError::Config(
                "PEXELS_API_KEY not found in environment or roomreel.toml".into(),
            ));
        }
        if self.heygen_api_key.is_empty() {
            return Err(PipelineError::Config(
                "HEYGEN_API_KEY not found in environment or roomreel.toml".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(PipelineError::Config("max_attempts must be at least 1".into()));
        }
        if self.search_results == 0 {
            return Err(PipelineError::Config("search_results must be at least 1".into()));
        }
        Ok(())
    }

    /// Política de novas tentativas derivada da configuração.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_timeout: Duration::from_secs(self.initial_timeout_secs),
            timeout_step: Duration::from_secs(self.timeout_step_secs),
            timeout_floor: Duration::from_secs(self.timeout_floor_secs),
            words_dropped: self.words_dropped_per_retry,
        }
    }

    /// Intervalos de polling derivados da configuração.
    pub fn poll_schedule(&self) -> PollSchedule {
        PollSchedule {
            interval: Duration::from_secs(self.poll_interval_secs),
            processing_interval: Duration::from_secs(self.processing_poll_interval_secs),
        }
    }
}
