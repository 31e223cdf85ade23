use thiserror::Error;

use crate::models::Empresa;
use crate::retry::PoliticaRetentativa;
use crate::ui;

pub const URL_RECEITAWS: &str = "https://www.receitaws.com.br/v1/cnpj";
pub const IDENTIFICACAO_CLIENTE: &str = "ConsultaCnpjApp";

#[derive(Debug, Error)]
pub enum ErroConsulta {
    #[error("Erro HTTP: {status} - {motivo}")]
    Http { status: u16, motivo: String },

    #[error("Número máximo de tentativas excedido após erros de limite de requisição.")]
    LimiteExcedido { tentativas: u32 },

    #[error(transparent)]
    Transporte(#[from] reqwest::Error),

    #[error("Resposta inválida da API: {0}")]
    Decodificacao(#[from] serde_json::Error),
}

/// Cliente da API pública de CNPJ. Criado uma vez no início do programa e
/// passado por referência para quem consulta.
pub struct ClienteCnpj {
    http: reqwest::Client,
    base_url: String,
    politica: PoliticaRetentativa,
}

impl ClienteCnpj {
    pub fn new(base_url: &str, politica: PoliticaRetentativa) -> Result<Self, ErroConsulta> {
        let http = reqwest::Client::builder()
            .user_agent(IDENTIFICACAO_CLIENTE)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            politica,
        })
    }

    pub fn url_consulta(&self, cnpj: &str) -> String {
        format!("{}/{}", self.base_url, cnpj)
    }

    /// Consulta um CNPJ já validado (14 dígitos).
    ///
    /// Respostas 429 são repetidas conforme a política, com espera fixa entre
    /// tentativas. Qualquer outro status fora de 2xx falha na hora, assim como
    /// erros de conexão.
    pub async fn consultar(&self, cnpj: &str) -> Result<Empresa, ErroConsulta> {
        let url = self.url_consulta(cnpj);
        ui::print_verbose(&format!("GET {}", url));

        let max_tentativas = self.politica.max_tentativas;
        let mut tentativa = 0;

        while tentativa < max_tentativas {
            tentativa += 1;

            let response = self
                .http
                .get(&url)
                .send()
                .await?;

            let status = response.status();
            ui::print_verbose(&format!("Tentativa {}/{}: HTTP {}", tentativa, max_tentativas, status));

            if self.politica.repete(status) {
                self.politica.aguardar(tentativa).await;
                continue;
            }

            if !status.is_success() {
                return Err(ErroConsulta::Http {
                    status: status.as_u16(),
                    motivo: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            let json = response.text().await?;
            ui::print_verbose(&format!("{} bytes recebidos", json.len()));

            return Ok(Empresa::from_json(&json)?);
        }

        Err(ErroConsulta::LimiteExcedido { tentativas: tentativa })
    }
}
