use serde::de::Error as _;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::{self, Write};

/// Dados cadastrais retornados pela ReceitaWS. Todos os campos são opcionais:
/// a API só devolve o que tem.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Empresa {
    pub nome: Option<String>,
    pub fantasia: Option<String>,
    pub cnpj: Option<String>,
    pub situacao: Option<String>,
    pub tipo: Option<String>,
    pub abertura: Option<String>,
    pub natureza_juridica: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub bairro: Option<String>,
    pub municipio: Option<String>,
    pub uf: Option<String>,
    pub cep: Option<String>,
}

impl Empresa {
    /// Decodifica o corpo da resposta ignorando maiúsculas/minúsculas nos nomes dos campos.
    /// `null` vira uma empresa vazia; qualquer coisa que não seja objeto é erro.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<Value>(json)? {
            Value::Null => Ok(Self::default()),
            Value::Object(campos) => {
                let normalizado: Map<String, Value> = campos
                    .into_iter()
                    .map(|(chave, valor)| (chave.to_lowercase(), valor))
                    .collect();
                serde_json::from_value(Value::Object(normalizado))
            }
            outro => Err(serde_json::Error::custom(format!(
                "esperado um objeto JSON, recebido {}",
                tipo_json(&outro)
            ))),
        }
    }

    pub fn endereco(&self) -> String {
        format!(
            "{}, {} - {}, {}/{} - CEP: {}",
            campo(&self.logradouro),
            campo(&self.numero),
            campo(&self.bairro),
            campo(&self.municipio),
            campo(&self.uf),
            campo(&self.cep),
        )
    }
}

fn tipo_json(valor: &Value) -> &'static str {
    match valor {
        Value::Null => "null",
        Value::Bool(_) => "booleano",
        Value::Number(_) => "número",
        Value::String(_) => "texto",
        Value::Array(_) => "lista",
        Value::Object(_) => "objeto",
    }
}

fn campo(valor: &Option<String>) -> &str {
    valor.as_deref().unwrap_or("")
}

pub fn escrever_relatorio<W: Write>(empresa: &Empresa, out: &mut W) -> io::Result<()> {
    writeln!(out, "\nEmpresa encontrada:")?;
    writeln!(out, "Nome: {}", campo(&empresa.nome))?;
    writeln!(out, "Fantasia: {}", campo(&empresa.fantasia))?;
    writeln!(out, "Situação: {}", campo(&empresa.situacao))?;
    writeln!(out, "Abertura: {}", campo(&empresa.abertura))?;
    writeln!(out, "Endereço: {}", empresa.endereco())?;
    Ok(())
}
