//! Exportação da série em LaTeX.

use std::path::Path;

use crate::sequence::SequenceReport;
use crate::GeoplotResult;

/// Nome padrão do arquivo exportado.
pub const DEFAULT_LATEX_FILE: &str = "sequence.tex";

/// Imagem referenciada pelo documento.
pub const CHART_IMAGE: &str = "chart.png";

/// Gera o documento `article` com o gráfico e a fórmula da série.
pub fn generate_document(report: &SequenceReport) -> String {
    format!(
        r"\documentclass{{article}}
\usepackage{{graphicx}}
\usepackage{{amsmath}}

\begin{{document}}

\begin{{figure}}
\centering
\includegraphics[width=0.8\textwidth]{{{image}}}
\caption{{Sequence plot}}
\end{{figure}}

\section*{{Sequence Formula}}

The sequence formula:

\[
{formula}
\]

The series {convergence} since $|r| = {ratio}$.

\end{{document}}
",
        image = CHART_IMAGE,
        formula = report.formula(),
        convergence = report.convergence,
        ratio = report.params.ratio.abs(),
    )
}

/// Escreve o documento em disco.
pub fn write_document(path: &Path, latex: &str) -> GeoplotResult<()> {
    std::fs::write(path, latex)?;

    tracing::info!(
        path = %path.display(),
        bytes = latex.len(),
        "LaTeX document written"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::requests::SequenceParameters;
    use tempfile::TempDir;

    fn report(first: f64, ratio: f64) -> SequenceReport {
        SequenceReport::compute(&SequenceParameters::new(first, ratio).unwrap())
    }

    #[test]
    fn test_document_structure() {
        let latex = generate_document(&report(1.0, 0.5));

        assert!(latex.starts_with(r"\documentclass{article}"));
        assert!(latex.contains(r"\includegraphics[width=0.8\textwidth]{chart.png}"));
        assert!(latex.contains(r"\sum_{i=1}^\infty 1 \cdot (1/2)^{i-1}"));
        assert!(latex.contains("converges"));
        assert!(latex.trim_end().ends_with(r"\end{document}"));
    }

    #[test]
    fn test_divergent_document() {
        let latex = generate_document(&report(3.0, -2.0));
        assert!(latex.contains("diverges"));
        assert!(latex.contains("(-2)^{i-1}"));
    }

    #[test]
    fn test_write_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_LATEX_FILE);

        let latex = generate_document(&report(1.0, 0.25));
        write_document(&path, &latex).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), latex);
    }
}
