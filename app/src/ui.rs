use colored::*;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::utils;

static QUIET: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn init(quiet: bool, verbose: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn print_info(message: &str) {
    if !is_quiet() {
        println!("{} {}", "ℹ".blue(), message);
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet() {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }
}

pub fn print_verbose(message: &str) {
    if is_verbose() && !is_quiet() {
        println!("  {}", message.dimmed());
    }
}

/// Exibe o prompt sem quebra de linha e lê a resposta do usuário (já sem espaços nas pontas).
pub fn ask_line<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    utils::ler_linha(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ask_line_escreve_prompt_e_le_resposta() {
        let mut input = Cursor::new("  19131243000197 \n");
        let mut output = Vec::new();

        let resposta = ask_line("CNPJ: ", &mut input, &mut output).unwrap();

        assert_eq!(resposta, "19131243000197");
        assert_eq!(String::from_utf8(output).unwrap(), "CNPJ: ");
    }

    #[test]
    fn ask_line_sem_entrada_retorna_vazio() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        assert_eq!(ask_line("CNPJ: ", &mut input, &mut output).unwrap(), "");
        assert_eq!(output, b"CNPJ: ");
    }
}
