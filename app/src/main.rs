mod api;
mod models;
mod retry;
mod ui;
mod utils;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::api::{ClienteCnpj, ErroConsulta, URL_RECEITAWS};
use crate::retry::{PoliticaRetentativa, MAX_TENTATIVAS};

const PROMPT: &str = "Digite um CNPJ (somente números): ";
const MSG_CNPJ_INVALIDO: &str = "CNPJ inválido. Deve conter exatamente 14 números (sem pontos, traços ou barras).";
const MSG_NAO_ENCONTRADO: &str = "CNPJ não encontrado ou dados indisponíveis.";
const MSG_ERRO_CONSULTA: &str = "Erro ao consultar o CNPJ:";

#[derive(Parser)]
#[command(name = "consulta-cnpj")]
#[command(about = "Consulta dados cadastrais de uma empresa pelo CNPJ", long_about = None)]
struct Cli {
    /// CNPJ a consultar (somente números). Sem ele, o programa pergunta no terminal
    #[arg(long)]
    cnpj: Option<String>,

    /// Endereço base da API de consulta
    #[arg(long, default_value = URL_RECEITAWS)]
    api_url: String,

    /// Número máximo de tentativas quando a API limita as requisições
    #[arg(long, default_value_t = MAX_TENTATIVAS, value_parser = clap::value_parser!(u32).range(1..))]
    tentativas: u32,

    /// Segundos de espera após cada resposta de limite de requisições
    #[arg(long, default_value_t = 60)]
    espera: u64,

    /// Modo silencioso (sem avisos nem contagem regressiva)
    #[arg(short, long)]
    quiet: bool,

    /// Modo verboso (mais detalhes)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    ui::init(cli.quiet, cli.verbose);
    ui::print_verbose(&format!("Hora de início: {}", Local::now().format("%Y-%m-%d %H:%M:%S")));

    let politica = PoliticaRetentativa::new(cli.tentativas, Duration::from_secs(cli.espera));
    let cliente = ClienteCnpj::new(&cli.api_url, politica)
        .context("Falha ao criar cliente HTTP")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    executar(&cliente, cli.cnpj, &mut stdin.lock(), &mut stdout)
        .await
        .context("Falha ao ler ou escrever no terminal")?;

    Ok(())
}

/// Lê e valida o CNPJ, consulta a API e imprime o resultado.
///
/// Erros da consulta são exibidos e não interrompem o programa; só falhas de
/// leitura/escrita no terminal sobem como erro.
async fn executar<R: BufRead, W: Write>(
    cliente: &ClienteCnpj,
    cnpj: Option<String>,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let cnpj = match cnpj {
        Some(cnpj) => cnpj.trim().to_string(),
        None => ui::ask_line(PROMPT, input, output)?,
    };

    if !utils::cnpj_valido(&cnpj) {
        writeln!(output, "{}", MSG_CNPJ_INVALIDO)?;
        return Ok(());
    }

    match cliente.consultar(&cnpj).await {
        Ok(empresa) if empresa.nome.is_some() => models::escrever_relatorio(&empresa, output)?,
        Ok(_) => writeln!(output, "{}", MSG_NAO_ENCONTRADO)?,
        Err(e) => {
            if let ErroConsulta::LimiteExcedido { tentativas } = &e {
                ui::print_verbose(&format!("{} tentativa(s) bloqueadas pelo limite de requisições", tentativas));
            }
            writeln!(output, "{}", MSG_ERRO_CONSULTA)?;
            writeln!(output, "{}", e)?;
        }
    }

    output.flush()
}
