use indexmap::IndexMap;
use serde::ser::{self, Serialize};

use super::ArgumentValue;
use crate::error::BuildError;

/// Converts any serializable value into an [`ArgumentValue`].
///
/// Unit enum variants become bareword enum values, structs and maps become objects. Shapes
/// without a GraphQL literal, such as data-carrying enum variants, are rejected with
/// [`BuildError::UnsupportedValueType`].
pub fn to_argument_value<T: Serialize + ?Sized>(value: &T) -> Result<ArgumentValue, BuildError> {
    value.serialize(ArgumentSerializer)
}

struct ArgumentSerializer;

fn unsupported(shape: impl std::fmt::Display) -> BuildError {
    BuildError::UnsupportedValueType(shape.to_string())
}

impl ser::Serializer for ArgumentSerializer {
    type Ok = ArgumentValue;
    type Error = BuildError;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = ser::Impossible<ArgumentValue, BuildError>;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = ser::Impossible<ArgumentValue, BuildError>;

    fn serialize_bool(self, v: bool) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<ArgumentValue, BuildError> {
        i64::try_from(v)
            .map(ArgumentValue::Int)
            .map_err(|_| unsupported(format!("i128 ({v})")))
    }

    fn serialize_u8(self, v: u8) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<ArgumentValue, BuildError> {
        i64::try_from(v)
            .map(ArgumentValue::Int)
            .map_err(|_| unsupported(format!("u64 ({v})")))
    }

    fn serialize_u128(self, v: u128) -> Result<ArgumentValue, BuildError> {
        i64::try_from(v)
            .map(ArgumentValue::Int)
            .map_err(|_| unsupported(format!("u128 ({v})")))
    }

    fn serialize_f32(self, v: f32) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::String(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<ArgumentValue, BuildError> {
        Err(unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<ArgumentValue, BuildError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Enum(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<ArgumentValue, BuildError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<ArgumentValue, BuildError> {
        Err(unsupported(format!("{name}::{variant} (newtype variant)")))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList, BuildError> {
        Ok(SerializeList {
            values: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList, BuildError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeList, BuildError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, BuildError> {
        Err(unsupported(format!("{name}::{variant} (tuple variant)")))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeObject, BuildError> {
        Ok(SerializeObject {
            fields: IndexMap::with_capacity(len.unwrap_or_default()),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeObject, BuildError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, BuildError> {
        Err(unsupported(format!("{name}::{variant} (struct variant)")))
    }
}

struct SerializeList {
    values: Vec<ArgumentValue>,
}

impl ser::SerializeSeq for SerializeList {
    type Ok = ArgumentValue;
    type Error = BuildError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), BuildError> {
        self.values.push(value.serialize(ArgumentSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::List(self.values))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = ArgumentValue;
    type Error = BuildError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), BuildError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<ArgumentValue, BuildError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = ArgumentValue;
    type Error = BuildError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), BuildError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<ArgumentValue, BuildError> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeObject {
    fields: IndexMap<String, ArgumentValue>,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeObject {
    type Ok = ArgumentValue;
    type Error = BuildError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), BuildError> {
        match key.serialize(ArgumentSerializer)? {
            ArgumentValue::String(key) | ArgumentValue::Enum(key) => {
                self.next_key = Some(key);
                Ok(())
            }
            other => Err(unsupported(format!("non-string map key ({other:?})"))),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), BuildError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| unsupported("map value without a key"))?;
        self.fields.insert(key, value.serialize(ArgumentSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Object(self.fields))
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = ArgumentValue;
    type Error = BuildError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<(), BuildError> {
        self.fields.insert(key.to_string(), value.serialize(ArgumentSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<ArgumentValue, BuildError> {
        Ok(ArgumentValue::Object(self.fields))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    enum DebugMode {
        Enabled,
    }

    #[derive(Serialize)]
    struct Range {
        from: f64,
        to: f64,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct DealerFilter {
        make: &'static str,
        limit: u8,
        trims: Vec<u32>,
        price_range: Range,
        debug: DebugMode,
        state: Option<String>,
    }

    #[test]
    fn struct_to_object() {
        let value = to_argument_value(&DealerFilter {
            make: "aston martin",
            limit: 2,
            trims: vec![143_783, 243_784],
            price_range: Range { from: 444.45, to: 555.45 },
            debug: DebugMode::Enabled,
            state: None,
        })
        .unwrap();

        insta::assert_snapshot!(value.render().unwrap(), @r###"{make:"aston martin", limit:2, trims:[143783, 243784], priceRange:{from:444.45, to:555.45}, debug:ENABLED, state:null}"###);
    }

    #[test]
    fn json_value_to_argument() {
        let value = to_argument_value(&serde_json::json!({"first": 100, "tags": ["a", true]})).unwrap();
        assert_eq!(value.render().unwrap(), r#"{first:100, tags:["a", true]}"#);
    }

    #[test]
    fn map_keys_must_be_strings() {
        let map = BTreeMap::from([(1, "one")]);
        assert!(matches!(
            to_argument_value(&map),
            Err(BuildError::UnsupportedValueType(_))
        ));
    }

    #[test]
    fn data_carrying_variants_are_unsupported() {
        #[derive(Serialize)]
        enum Shape {
            Circle { radius: f64 },
            Point(i32, i32),
        }

        let err = to_argument_value(&Shape::Circle { radius: 1.0 }).unwrap_err();
        insta::assert_snapshot!(err, @"Unsupported argument value, type found: Shape::Circle (struct variant)");
        let err = to_argument_value(&Shape::Point(1, 2)).unwrap_err();
        insta::assert_snapshot!(err, @"Unsupported argument value, type found: Shape::Point (tuple variant)");
    }

    #[test]
    fn out_of_range_integers() {
        assert!(to_argument_value(&u64::MAX).is_err());
        assert_eq!(to_argument_value(&42u64).unwrap(), ArgumentValue::Int(42));
    }
}
