use std::io::{self, BufRead};

pub const CNPJ_DIGITOS: usize = 14;

/// CNPJ aceito: exatamente 14 dígitos decimais, sem pontos, traços, barras ou espaços.
pub fn cnpj_valido(cnpj: &str) -> bool {
    cnpj.len() == CNPJ_DIGITOS && cnpj.bytes().all(|b| b.is_ascii_digit())
}

/// Lê uma linha da entrada. Fim de arquivo resulta em string vazia.
pub fn ler_linha<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut linha = String::new();
    input.read_line(&mut linha)?;
    Ok(linha.trim().to_string())
}
