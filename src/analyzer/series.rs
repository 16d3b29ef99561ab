use std::collections::HashMap;

use serde::Serialize;

use crate::config::{DashboardConfig, DimensaoConfig};
use crate::filters::FilterSnapshot;
use crate::parser::types::Registro;

/// Série label/valor pronta para gráfico, ordenada por contagem decrescente.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerieGrafico {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl SerieGrafico {
    /// Truncamento top-N para a camada de apresentação. Sempre aplicado
    /// depois da ordenação; a série canônica não é limitada.
    pub fn top(&self, n: usize) -> SerieGrafico {
        SerieGrafico {
            labels: self.labels.iter().take(n).cloned().collect(),
            values: self.values.iter().take(n).copied().collect(),
        }
    }
}

/// Aplica o snapshot de filtros e devolve uma cópia defensiva do subconjunto.
///
/// Um registro passa se, para cada dimensão categórica ativa, o valor do
/// campo mapeado pertence ao conjunto aceito, e se o carimbo cai no período
/// inclusivo. Registros sem carimbo legível passam pelo filtro de período
/// (inclusão conservadora; só as séries temporais os excluem).
pub fn aplicar_filtros(
    registros: &[Registro],
    snapshot: &FilterSnapshot,
    config: &DashboardConfig,
) -> Vec<Registro> {
    registros
        .iter()
        .filter(|r| passa(r, snapshot, config))
        .cloned()
        .collect()
}

fn passa(registro: &Registro, snapshot: &FilterSnapshot, config: &DashboardConfig) -> bool {
    if let Some(ms) = registro.data_hora {
        if ms < snapshot.periodo.inicio || ms > snapshot.periodo.fim {
            return false;
        }
    }

    for (chave, valores) in &snapshot.dimensoes {
        if valores.is_empty() {
            continue;
        }
        // dimensões fora da tabela configurada não restringem nada
        if let Some(dim) = config.dimensao(chave) {
            let valor = dim.campo.valor(registro);
            if !valores.iter().any(|v| v == valor) {
                return false;
            }
        }
    }

    true
}

/// Agrupa o subconjunto filtrado pelo campo da dimensão, conta ocorrências e
/// ordena por contagem decrescente. Empates preservam a ordem de primeira
/// aparição (sort estável).
pub fn serie_por_dimensao<'a>(
    registros: &'a [Registro],
    dim: &'a DimensaoConfig,
) -> SerieGrafico {
    let mut contagem: HashMap<&'a str, usize> = HashMap::new();
    let mut ordem: Vec<&'a str> = Vec::new();

    for registro in registros {
        let valor = dim.campo.valor(registro);
        let valor = if valor.is_empty() {
            dim.valor_default.as_str()
        } else {
            valor
        };
        match contagem.get_mut(valor) {
            Some(c) => *c += 1,
            None => {
                contagem.insert(valor, 1);
                ordem.push(valor);
            }
        }
    }

    let mut itens: Vec<(&str, usize)> = ordem.into_iter().map(|l| (l, contagem[l])).collect();
    itens.sort_by(|a, b| b.1.cmp(&a.1));

    SerieGrafico {
        labels: itens.iter().map(|(l, _)| l.to_string()).collect(),
        values: itens.iter().map(|(_, v)| *v).collect(),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
