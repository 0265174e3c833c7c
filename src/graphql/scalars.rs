use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};

/// 64-bit integer scalar for epoch-millisecond timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Long(pub i64);

#[Scalar(name = "Long")]
impl ScalarType for Long {
    fn parse(value: Value) -> InputValueResult<Self> {
        if let Value::Number(number) = &value {
            if let Some(long) = number.as_i64() {
                return Ok(Long(long));
            }
        }
        Err(InputValueError::expected_type(value))
    }

    fn to_value(&self) -> Value {
        Value::Number(self.0.into())
    }
}
