use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use reqwest::StatusCode;
use std::io::{self, Write};
use std::time::Duration;

use crate::ui;

pub const MAX_TENTATIVAS: u32 = 5;
pub const ESPERA_LIMITE: Duration = Duration::from_secs(60);
const INTERVALO_CONTAGEM: Duration = Duration::from_secs(1);

/// Política de nova tentativa para respostas de limite de requisições.
///
/// A espera é fixa: sem backoff exponencial, sem jitter, e a mesma para a
/// primeira ou a quinta resposta limitada.
#[derive(Debug, Clone)]
pub struct PoliticaRetentativa {
    pub max_tentativas: u32,
    pub espera: Duration,
    /// Passo da contagem regressiva exibida durante a espera.
    pub intervalo: Duration,
    pub deve_repetir: fn(StatusCode) -> bool,
}

fn limite_de_requisicoes(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
}

impl Default for PoliticaRetentativa {
    fn default() -> Self {
        Self {
            max_tentativas: MAX_TENTATIVAS,
            espera: ESPERA_LIMITE,
            intervalo: INTERVALO_CONTAGEM,
            deve_repetir: limite_de_requisicoes,
        }
    }
}

impl PoliticaRetentativa {
    pub fn new(max_tentativas: u32, espera: Duration) -> Self {
        Self {
            max_tentativas: max_tentativas.max(1),
            espera,
            ..Self::default()
        }
    }

    pub fn sem_espera(max_tentativas: u32) -> Self {
        Self::new(max_tentativas, Duration::ZERO)
    }

    pub fn repete(&self, status: StatusCode) -> bool {
        (self.deve_repetir)(status)
    }

    /// Aguarda a espera configurada mostrando a contagem regressiva.
    ///
    /// Em terminal a contagem é uma barra do indicatif; com a saída redirecionada
    /// (pipe, arquivo) cada passo vira uma linha `\rAguardando... Ns`.
    pub async fn aguardar(&self, tentativa: u32) {
        ui::print_warning(&format!(
            "Limite de requisições excedido. Aguardando {} segundos (tentativa {}/{}):",
            self.espera.as_secs(),
            tentativa,
            self.max_tentativas
        ));

        let passos = self.passos();
        if passos > 0 {
            let alvo = ProgressDrawTarget::stdout();
            let resultado = if ui::is_quiet() {
                self.contagem_texto(passos, &mut io::sink()).await
            } else if alvo.is_hidden() {
                self.contagem_texto(passos, &mut io::stdout()).await
            } else {
                self.contagem_barra(passos, alvo).await;
                Ok(())
            };

            if let Err(e) = resultado {
                ui::print_verbose(&format!("Falha ao exibir contagem: {}", e));
            }
        }

        ui::print_info("Tentando novamente...");
    }

    async fn contagem_barra(&self, passos: u64, alvo: ProgressDrawTarget) {
        let pb = barra_contagem(passos, alvo);
        for restante in (1..=passos).rev() {
            pb.set_position(passos - restante);
            pb.set_message(format!("{}s", self.restante_em_segundos(restante)));
            tokio::time::sleep(self.intervalo).await;
        }
        pb.set_position(passos);
        pb.finish_with_message("0s");
    }

    /// Contagem em texto simples: um passo por intervalo, reescrevendo a mesma linha.
    async fn contagem_texto<W: Write>(&self, passos: u64, out: &mut W) -> io::Result<()> {
        for restante in (1..=passos).rev() {
            write!(out, "\rAguardando... {}s  ", self.restante_em_segundos(restante))?;
            out.flush()?;
            tokio::time::sleep(self.intervalo).await;
        }
        writeln!(out, "\rAguardando... 0s  ")?;
        out.flush()
    }

    fn passos(&self) -> u64 {
        if self.espera.is_zero() || self.intervalo.is_zero() {
            return 0;
        }
        let passos = self.espera.as_millis() / self.intervalo.as_millis().max(1);
        u64::try_from(passos).unwrap_or(u64::MAX).max(1)
    }

    fn restante_em_segundos(&self, passos_restantes: u64) -> u64 {
        let intervalo_ms = u64::try_from(self.intervalo.as_millis()).unwrap_or(u64::MAX);
        intervalo_ms.saturating_mul(passos_restantes).div_ceil(1000)
    }
}

fn barra_contagem(passos: u64, alvo: ProgressDrawTarget) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(passos), alvo);
    pb.set_style(
        ProgressStyle::with_template("Aguardando... {msg:>4} [{bar:30.yellow/blue}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn padrao_repete_apenas_429() {
        let politica = PoliticaRetentativa::default();
        assert_eq!(politica.max_tentativas, 5);
        assert_eq!(politica.espera, Duration::from_secs(60));
        assert!(politica.repete(StatusCode::TOO_MANY_REQUESTS));
        assert!(!politica.repete(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!politica.repete(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!politica.repete(StatusCode::OK));
    }

    #[test]
    fn contagem_decresce_um_segundo_por_passo() {
        let politica = PoliticaRetentativa::default();
        assert_eq!(politica.passos(), 60);
        assert_eq!(politica.restante_em_segundos(60), 60);
        assert_eq!(politica.restante_em_segundos(1), 1);
    }

    #[test]
    fn sem_espera_nao_tem_passos() {
        assert_eq!(PoliticaRetentativa::sem_espera(3).passos(), 0);
    }

    #[test]
    fn zero_tentativas_vira_uma() {
        assert_eq!(PoliticaRetentativa::new(0, ESPERA_LIMITE).max_tentativas, 1);
        assert_eq!(PoliticaRetentativa::sem_espera(0).max_tentativas, 1);
    }

    #[test]
    fn espera_enorme_nao_estoura() {
        let politica = PoliticaRetentativa::new(5, Duration::from_secs(u64::MAX));
        let passos = politica.passos();
        assert_eq!(passos, u64::MAX);
        assert_eq!(politica.restante_em_segundos(passos), u64::MAX.div_ceil(1000));
        assert_eq!(politica.restante_em_segundos(1), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn contagem_texto_escreve_um_passo_por_segundo() {
        let politica = PoliticaRetentativa::new(5, Duration::from_secs(3));
        let mut out = Vec::new();
        let inicio = tokio::time::Instant::now();

        politica.contagem_texto(politica.passos(), &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\rAguardando... 3s  \rAguardando... 2s  \rAguardando... 1s  \rAguardando... 0s  \n"
        );
        assert!(inicio.elapsed() >= Duration::from_secs(3));
        assert!(inicio.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn contagem_padrao_vai_de_60_a_0() {
        let politica = PoliticaRetentativa::default();
        let mut out = Vec::new();
        politica.contagem_texto(politica.passos(), &mut out).await.unwrap();

        let texto = String::from_utf8(out).unwrap();
        let linhas: Vec<&str> = texto.split('\r').filter(|s| !s.is_empty()).map(str::trim_end).collect();
        let esperado: Vec<String> = (0..=60).rev().map(|s| format!("Aguardando... {}s", s)).collect();
        assert_eq!(linhas, esperado);
    }

    #[tokio::test]
    async fn sem_espera_retorna_imediatamente() {
        let inicio = Instant::now();
        PoliticaRetentativa::sem_espera(5).aguardar(1).await;
        assert!(inicio.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn espera_completa_dura_o_tempo_configurado() {
        let politica = PoliticaRetentativa::default();
        let inicio = tokio::time::Instant::now();
        politica.aguardar(1).await;
        let decorrido = inicio.elapsed();
        assert!(decorrido >= Duration::from_secs(60));
        assert!(decorrido < Duration::from_secs(61));
    }
}
