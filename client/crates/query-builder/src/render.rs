use std::fmt::Write;

use crate::{
    error::BuildError,
    query::{Query, Selection},
    value::write_key_values,
};

/// Number of spaces added for each nested selection block.
pub const INDENT_SIZE: usize = 4;

/// Accumulates the text of one query, writing the alias, name, arguments, comment and
/// selections of a [`Query`] and recursing into its sub-selections.
#[derive(Debug, Default)]
pub struct QueryWriter {
    buffer: String,
}

impl QueryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Writes the `key:value` pairs of the query arguments, without the surrounding parentheses.
    pub fn write_arguments(&mut self, query: &Query) -> Result<(), BuildError> {
        write_key_values(&mut self.buffer, query.arguments())
    }

    /// Writes one line per selected field, sub-selections being written as full nested queries.
    pub fn write_selections(&mut self, query: &Query, indent: usize) -> Result<(), BuildError> {
        for selection in query.selections() {
            match selection {
                Selection::Field(field) => {
                    self.pad(indent);
                    self.buffer.push_str(field);
                    self.buffer.push('\n');
                }
                Selection::Query(sub_query) => {
                    self.write_query(sub_query, indent)?;
                    self.buffer.push('\n');
                }
            }
        }
        Ok(())
    }

    /// Writes each line of `comment` as a `# ` prefixed line. Writes nothing for an empty comment.
    pub fn write_comment(&mut self, comment: &str, indent: usize) {
        if comment.is_empty() {
            return;
        }
        for line in comment.split('\n') {
            self.pad(indent);
            self.buffer.push_str("# ");
            self.buffer.push_str(line);
            self.buffer.push('\n');
        }
    }

    /// Writes `[alias:]name[(arguments)]{ comment selections }` at the given indentation.
    pub fn write_query(&mut self, query: &Query, indent: usize) -> Result<(), BuildError> {
        self.pad(indent);
        if let Some(alias) = query.alias() {
            self.buffer.push_str(alias);
            self.buffer.push(':');
        }
        self.buffer.push_str(query.name());

        if !query.arguments().is_empty() {
            self.buffer.push('(');
            self.write_arguments(query)?;
            self.buffer.push(')');
        }

        self.buffer.push_str("{\n");
        self.write_comment(query.comment().unwrap_or_default(), indent + INDENT_SIZE);
        self.write_selections(query, indent + INDENT_SIZE)?;
        self.pad(indent);
        self.buffer.push('}');
        Ok(())
    }

    pub(crate) fn write_raw(&mut self, raw: &str) {
        self.buffer.push_str(raw);
    }

    fn pad(&mut self, indent: usize) {
        let _ = write!(self.buffer, "{:indent$}", "");
    }
}

#[cfg(test)]
mod tests {
    use indexmap::indexmap;

    use super::*;
    use crate::value::{ArgumentValue, Enum};

    fn remove_whitespace(input: &str) -> String {
        input.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn sub_dealer() -> Query {
        Query::new("subDealer")
            .select_fields(["subName", "subMake", "subModel"])
            .set_arguments(indexmap! {
                "subMake" => ArgumentValue::from("aston martin"),
                "subState" => ArgumentValue::from("ca"),
                "subLimit" => ArgumentValue::from(1),
                "__debug" => ArgumentValue::from(Enum::new("DISABLED")),
                "SuperQuerySpeed" => ArgumentValue::from(Enum::new("ENABLED")),
            })
            .unwrap()
    }

    #[test]
    fn arguments_without_parentheses() {
        let query = Query::new("test1")
            .select("name")
            .set_arguments(indexmap! {
                "from" => ArgumentValue::from(123),
                "to" => ArgumentValue::from(454),
                "recurse" => ArgumentValue::from(vec!["aa", "bb", "cc"]),
                "map" => ArgumentValue::from(indexmap! { "from" => 444.45, "to" => 555.45 }),
                "name" => ArgumentValue::from(Enum::new("HAYstack")),
            })
            .unwrap();

        let mut writer = QueryWriter::new();
        writer.write_arguments(&query).unwrap();
        insta::assert_snapshot!(writer.as_str(), @r###"from:123, to:454, recurse:["aa", "bb", "cc"], map:{from:444.45, to:555.45}, name:HAYstack"###);

        writer.clear();
        assert!(writer.as_str().is_empty());
    }

    #[test]
    fn no_arguments_writes_nothing() {
        let mut writer = QueryWriter::new();
        writer.write_arguments(&Query::new("test1").select("id")).unwrap();
        assert_eq!(writer.as_str(), "");
    }

    #[test]
    fn selections_with_sub_query() {
        let query = Query::new("test1")
            .select_fields(["more", "things", "in_a_select"])
            .select_query(sub_dealer())
            .unwrap();

        let mut writer = QueryWriter::new();
        writer.write_selections(&query, 0).unwrap();
        insta::assert_snapshot!(writer.into_string(), @r###"
        more
        things
        in_a_select
        subDealer(subMake:"aston martin", subState:"ca", subLimit:1, __debug:DISABLED, SuperQuerySpeed:ENABLED){
            subName
            subMake
            subModel
        }
        "###);
    }

    #[test]
    fn multiline_comment() {
        let mut writer = QueryWriter::new();
        writer.write_comment("", 4);
        assert_eq!(writer.as_str(), "");

        writer.write_comment("first line\nsecond line", 4);
        assert_eq!(writer.as_str(), "    # first line\n    # second line\n");
    }

    #[test]
    fn nested_query_layout() {
        let query = Query::new("Dealer")
            .with_alias("myDealerAlias")
            .with_comment("dealers in\nCalifornia")
            .set_argument("make", "aston martin")
            .unwrap()
            .set_argument("limit", 2)
            .unwrap()
            .set_argument("trims", vec![143_783, 243_784])
            .unwrap()
            .set_argument("_debug", Enum::new("ENABLED"))
            .unwrap()
            .select("id")
            .select_query(sub_dealer())
            .unwrap()
            .select("name");

        let mut writer = QueryWriter::new();
        writer.write_query(&query, 0).unwrap();
        let text = writer.into_string();

        insta::assert_snapshot!(text, @r###"
        myDealerAlias:Dealer(make:"aston martin", limit:2, trims:[143783, 243784], _debug:ENABLED){
            # dealers in
            # California
            id
            subDealer(subMake:"aston martin", subState:"ca", subLimit:1, __debug:DISABLED, SuperQuerySpeed:ENABLED){
                subName
                subMake
                subModel
            }
            name
        }
        "###);
        assert_eq!(
            remove_whitespace(&text),
            remove_whitespace(
                r#"myDealerAlias:Dealer(make:"aston martin",limit:2,trims:[143783,243784],_debug:ENABLED){
                    #dealersin #California
                    id
                    subDealer(subMake:"aston martin",subState:"ca",subLimit:1,__debug:DISABLED,SuperQuerySpeed:ENABLED){subName subMake subModel}
                    name
                }"#
            )
        );
    }
}
