//! Calculator models and wire DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CalculatorError;

/// Arithmetic operations served by the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponent,
}

impl Operation {
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Exponent,
    ];

    /// Name used in requests and routes (`add`, `divide`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Exponent => "exponent",
        }
    }

    /// Name reported in results and health payloads (`addition`, ...).
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Subtract => "subtraction",
            Self::Multiply => "multiplication",
            Self::Divide => "division",
            Self::Exponent => "exponentiation",
        }
    }

    /// Legacy route of the operation service, where one existed.
    #[must_use]
    pub const fn legacy_verb(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("sumar"),
            Self::Multiply => Some("multiplicar"),
            Self::Divide => Some("dividir"),
            Self::Subtract | Self::Exponent => None,
        }
    }

    /// Environment variable overriding the backend address for this operation.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Add => "ADDITION_SERVICE",
            Self::Subtract => "SUBTRACTION_SERVICE",
            Self::Multiply => "MULTIPLICATION_SERVICE",
            Self::Divide => "DIVISION_SERVICE",
            Self::Exponent => "EXPONENT_SERVICE",
        }
    }

    /// Default listen port of the operation service.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Add => 5001,
            Self::Subtract => 5002,
            Self::Multiply => 5003,
            Self::Divide => 5004,
            Self::Exponent => 5006,
        }
    }
}

impl Operation {
    /// Exact lookup of an operation name as sent by clients: the route name or
    /// the legacy Spanish key. No trimming, no case folding.
    ///
    /// # Errors
    /// Returns `CalculatorError::InvalidOperation` for any other string.
    pub fn from_wire(name: &str) -> Result<Self, CalculatorError> {
        match name {
            "add" | "suma" => Ok(Self::Add),
            "subtract" | "resta" => Ok(Self::Subtract),
            "multiply" | "multiplicacion" => Ok(Self::Multiply),
            "divide" | "division" => Ok(Self::Divide),
            "exponent" | "exponente" => Ok(Self::Exponent),
            _ => Err(CalculatorError::InvalidOperation),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CalculatorError;

    /// Lenient parse for operator input: case-insensitive, also accepting the
    /// result noun. Requests use [`Operation::from_wire`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "addition" | "suma" => Ok(Self::Add),
            "subtract" | "subtraction" | "resta" => Ok(Self::Subtract),
            "multiply" | "multiplication" | "multiplicacion" => Ok(Self::Multiply),
            "divide" | "division" => Ok(Self::Divide),
            "exponent" | "exponentiation" | "exponente" => Ok(Self::Exponent),
            _ => Err(CalculatorError::InvalidOperation),
        }
    }
}

/// Look up the first present key among `keys`.
fn field<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| body.get(*k))
}

/// Parse one operand: a JSON number or a string holding a number. Must be finite.
fn parse_operand(value: Option<&Value>) -> Result<f64, CalculatorError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or(CalculatorError::InvalidInput)
}

/// Two validated operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operands {
    pub a: f64,
    pub b: f64,
}

impl Operands {
    /// Extract operands from a request body (`a`/`num1` and `b`/`num2`).
    ///
    /// # Errors
    /// Returns `CalculatorError::InvalidInput` if either operand is missing,
    /// non-numeric or not finite.
    pub fn from_json(body: &Value) -> Result<Self, CalculatorError> {
        Ok(Self {
            a: parse_operand(field(body, &["a", "num1"]))?,
            b: parse_operand(field(body, &["b", "num2"]))?,
        })
    }
}

/// A validated calculation request received by the gateway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationRequest {
    pub operand_a: f64,
    pub operand_b: f64,
    pub operation: Operation,
}

impl CalculationRequest {
    /// Build a request from a client body (`operation`/`operacion` plus operands).
    ///
    /// The operation is validated first.
    ///
    /// # Errors
    /// Returns `CalculatorError::InvalidOperation` for a missing or unknown
    /// operation and `CalculatorError::InvalidInput` for bad operands.
    pub fn from_json(body: &Value) -> Result<Self, CalculatorError> {
        let operation = field(body, &["operation", "operacion"])
            .and_then(Value::as_str)
            .ok_or(CalculatorError::InvalidOperation)
            .and_then(Operation::from_wire)?;
        let Operands { a, b } = Operands::from_json(body)?;
        Ok(Self {
            operand_a: a,
            operand_b: b,
            operation,
        })
    }
}

/// Body sent by the gateway to an operation service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpstreamOperands {
    pub num1: f64,
    pub num2: f64,
}

impl From<&CalculationRequest> for UpstreamOperands {
    fn from(req: &CalculationRequest) -> Self {
        Self {
            num1: req.operand_a,
            num2: req.operand_b,
        }
    }
}

/// Outcome of one calculation as it appears on the wire.
///
/// Exactly one of `result` or `error` is present.
///
/// Non-finite results are written as the strings `"Infinity"`, `"-Infinity"`
/// and `"NaN"`, since JSON numbers cannot hold them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculationResult {
    Success {
        #[serde(with = "wire_f64")]
        result: f64,
        operation: String,
    },
    Failure {
        error: String,
    },
}

mod wire_f64 {
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if value.is_sign_positive() { "Infinity" } else { "-Infinity" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(de::Error::custom(format!("not a result value: {other}"))),
            },
        }
    }
}

impl CalculationResult {
    #[must_use]
    pub fn success(operation: Operation, result: f64) -> Self {
        Self::Success {
            result,
            operation: operation.noun().to_owned(),
        }
    }

    #[must_use]
    pub fn failure(error: &CalculatorError) -> Self {
        Self::Failure {
            error: error.to_string(),
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<f64> {
        match self {
            Self::Success { result, .. } => Some(*result),
            Self::Failure { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}

/// Liveness payload returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy(service: &str) -> Self {
        Self {
            status: "healthy".to_owned(),
            service: service.to_owned(),
        }
    }
}

/// Payload of `GET /operations/count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCount {
    pub operation: String,
    pub count: u64,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_input_parse_is_lenient() {
        assert_eq!("add".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!("Addition".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!("suma".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!(" divide ".parse::<Operation>().unwrap(), Operation::Divide);
        assert_eq!(
            "exponente".parse::<Operation>().unwrap(),
            Operation::Exponent
        );
        assert_eq!(
            "modulo".parse::<Operation>().unwrap_err(),
            CalculatorError::InvalidOperation
        );
    }

    #[test]
    fn wire_names_match_exactly() {
        assert_eq!(Operation::from_wire("add"), Ok(Operation::Add));
        assert_eq!(Operation::from_wire("resta"), Ok(Operation::Subtract));
        assert_eq!(Operation::from_wire("division"), Ok(Operation::Divide));
        assert_eq!(Operation::from_wire("exponente"), Ok(Operation::Exponent));
        for name in ["Addition", "addition", " ADD ", "add ", "exponentiation", "Multiply", ""] {
            assert_eq!(
                Operation::from_wire(name),
                Err(CalculatorError::InvalidOperation),
                "{name:?} must not be accepted"
            );
        }
    }

    #[test]
    fn operation_round_trips_through_display() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn operands_accept_both_key_styles_and_numeric_strings() {
        let ops = Operands::from_json(&json!({"a": 1.5, "b": "2"})).unwrap();
        assert_eq!(ops, Operands { a: 1.5, b: 2.0 });

        let ops = Operands::from_json(&json!({"num1": -3, "num2": 4})).unwrap();
        assert_eq!(ops, Operands { a: -3.0, b: 4.0 });
    }

    #[test]
    fn operands_reject_missing_non_numeric_and_non_finite() {
        for body in [
            json!({"a": 1}),
            json!({"a": "x", "b": 1}),
            json!({"a": true, "b": 1}),
            json!({"a": "inf", "b": 1}),
            json!({"a": "NaN", "b": 1}),
            json!([1, 2]),
        ] {
            assert_eq!(
                Operands::from_json(&body).unwrap_err(),
                CalculatorError::InvalidInput,
                "body {body} must be rejected"
            );
        }
    }

    #[test]
    fn request_validates_operation_before_operands() {
        let err = CalculationRequest::from_json(&json!({"operation": "nope"})).unwrap_err();
        assert_eq!(err, CalculatorError::InvalidOperation);

        let err = CalculationRequest::from_json(&json!({"num1": 1, "num2": 2})).unwrap_err();
        assert_eq!(err, CalculatorError::InvalidOperation);

        let err = CalculationRequest::from_json(&json!({"operation": "Addition", "num1": 1, "num2": 2}))
            .unwrap_err();
        assert_eq!(err, CalculatorError::InvalidOperation);

        let err =
            CalculationRequest::from_json(&json!({"operation": "add", "num1": 1})).unwrap_err();
        assert_eq!(err, CalculatorError::InvalidInput);
    }

    #[test]
    fn request_accepts_legacy_field_names() {
        let req =
            CalculationRequest::from_json(&json!({"a": 2, "b": 3, "operacion": "resta"})).unwrap();
        assert_eq!(req.operation, Operation::Subtract);
        assert_eq!(UpstreamOperands::from(&req), UpstreamOperands { num1: 2.0, num2: 3.0 });
    }

    #[test]
    fn calculation_result_wire_shapes() {
        let ok = CalculationResult::success(Operation::Add, 5.0);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"result": 5.0, "operation": "addition"})
        );
        assert_eq!(ok.result(), Some(5.0));
        assert_eq!(ok.error(), None);

        let err = CalculationResult::failure(&CalculatorError::DivisionByZero);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"error": "Division by zero is not allowed"})
        );
        assert_eq!(err.result(), None);

        let parsed: CalculationResult =
            serde_json::from_value(json!({"error": "Invalid input"})).unwrap();
        assert_eq!(parsed.error(), Some("Invalid input"));
    }

    #[test]
    fn non_finite_results_are_spelled_out() {
        let over = CalculationResult::success(Operation::Multiply, f64::INFINITY);
        assert_eq!(
            serde_json::to_value(&over).unwrap(),
            json!({"result": "Infinity", "operation": "multiplication"})
        );
        let under = CalculationResult::success(Operation::Multiply, f64::NEG_INFINITY);
        assert_eq!(serde_json::to_value(&under).unwrap()["result"], "-Infinity");
        let nan = CalculationResult::success(Operation::Exponent, f64::NAN);
        assert_eq!(serde_json::to_value(&nan).unwrap()["result"], "NaN");

        let parsed: CalculationResult =
            serde_json::from_value(json!({"result": "NaN", "operation": "exponentiation"})).unwrap();
        assert!(parsed.result().unwrap().is_nan());
        let parsed: CalculationResult =
            serde_json::from_value(json!({"result": "-Infinity", "operation": "multiplication"}))
                .unwrap();
        assert_eq!(parsed.result(), Some(f64::NEG_INFINITY));
    }
}
