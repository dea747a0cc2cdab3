//! Transporte newline-delimited JSON.
//!
//! Cada mensagem é um objeto JSON-RPC 2.0 completo numa única linha:
//!
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"tools/list"}\n
//! {"jsonrpc":"2.0","id":1,"result":{...}}\n
//! ```

use std::io::{BufRead, BufReader, BufWriter, Stdin, Stdout, Write};

use crate::GeoplotResult;

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Uma linha lida do cliente.
#[derive(Debug)]
pub enum Incoming {
    /// Request bem formada.
    Request(JsonRpcRequest),

    /// Linha que não pôde ser lida como request.
    Malformed(JsonRpcError),

    /// Fim da entrada.
    Closed,
}

/// Transporte sobre qualquer par leitor/escritor.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// Transporte sobre stdin/stdout.
pub type StdioTransport = LineTransport<BufReader<Stdin>, BufWriter<Stdout>>;

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(
            BufReader::new(std::io::stdin()),
            BufWriter::new(std::io::stdout()),
        )
    }
}

impl<R: BufRead, W: Write> LineTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Lê a próxima mensagem, pulando linhas em branco.
    pub fn read_message(&mut self) -> GeoplotResult<Incoming> {
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(Incoming::Closed);
            }
            if !line.trim().is_empty() {
                break;
            }
        }

        let value: serde_json::Value = match serde_json::from_str(line.trim()) {
            Ok(v) => v,
            Err(e) => return Ok(Incoming::Malformed(JsonRpcError::parse_error(e))),
        };

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => {
                tracing::debug!(method = %request.method, id = ?request.id, "Received request");
                Ok(Incoming::Request(request))
            }
            Err(e) => Ok(Incoming::Malformed(JsonRpcError::invalid_request(
                e.to_string(),
            ))),
        }
    }

    /// Escreve a resposta como JSON compacto seguido de `\n`.
    pub fn write_response(&mut self, response: &JsonRpcResponse) -> GeoplotResult<()> {
        let body = serde_json::to_string(response)?;

        self.writer.write_all(body.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        tracing::debug!(id = ?response.id, is_error = response.is_error(), "Sent response");
        Ok(())
    }

    /// Devolve o escritor.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::protocol::{JsonRpcId, INVALID_REQUEST, PARSE_ERROR};
    use serde_json::json;
    use std::io::Cursor;

    fn transport(input: &str) -> LineTransport<Cursor<Vec<u8>>, Vec<u8>> {
        LineTransport::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn expect_request(incoming: Incoming) -> JsonRpcRequest {
        match incoming {
            Incoming::Request(request) => request,
            other => panic!("expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_messages_and_blank_lines() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n"
        );
        let mut transport = transport(input);

        let first = expect_request(transport.read_message().unwrap());
        assert_eq!(first.method, "initialize");
        assert_eq!(first.id, Some(JsonRpcId::Number(1)));

        let second = expect_request(transport.read_message().unwrap());
        assert_eq!(second.method, "tools/list");

        assert!(matches!(transport.read_message().unwrap(), Incoming::Closed));
    }

    #[test]
    fn test_malformed_lines() {
        let mut transport = transport("not json\n{\"id\":1}\n");

        match transport.read_message().unwrap() {
            Incoming::Malformed(err) => assert_eq!(err.code, PARSE_ERROR),
            other => panic!("unexpected {:?}", other),
        }
        match transport.read_message().unwrap() {
            Incoming::Malformed(err) => assert_eq!(err.code, INVALID_REQUEST),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_closed() {
        let mut transport = transport("");
        assert!(matches!(transport.read_message().unwrap(), Incoming::Closed));
    }

    #[test]
    fn test_write_response_is_single_line() {
        let mut transport = transport("");
        let response = JsonRpcResponse::success(Some(1.into()), json!({"a": {"b": [1, 2]}}));
        transport.write_response(&response).unwrap();

        let output = String::from_utf8(transport.into_writer()).unwrap();
        assert!(output.ends_with('\n'));
        assert_eq!(output.lines().count(), 1);

        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(parsed["jsonrpc"], "2.0");
        assert_eq!(parsed["result"]["a"]["b"][1], 2);
    }
}
