//! Selection-list scanner and reader
//!
//! `.select()` arguments are comma-separated lists with nested relation
//! embeddings, e.g. `"id, owner:profiles!inner(username), data->meta"`.
//! A small scanner produces a token stream and a recursive-descent
//! reader assembles it into [`SelectItem`]s, so commas split only at
//! paren depth zero and nested lists stay intact.

/// Required-join modifier; inert for validation purposes
const INNER_MODIFIER: &str = "!inner";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Comma,
    LParen,
    RParen,
    Colon,
    /// `->` or `->>` JSON path operator
    Arrow,
    Ident(String),
}

/// One parsed unit of a selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    /// `alias:` prefix; never validated
    pub alias: Option<String>,
    pub node: SelectNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectNode {
    /// Plain column reference, normalized (modifier and qualifier
    /// suffixes stripped)
    Column(String),
    /// Relation embedding: `name(inner, ...)`
    Relation { name: String, items: Vec<SelectItem> },
}

/// Tokenize and read a selection list.
///
/// `*` survives as a column here; deciding what is validatable is the
/// caller's job.
pub fn parse_select_list(input: &str) -> Vec<SelectItem> {
    let tokens = scan(input);
    let mut reader = Reader {
        tokens: &tokens,
        pos: 0,
    };
    reader.items()
}

fn scan(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b':' => {
                tokens.push(Token::Colon);
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'>') => {
                tokens.push(Token::Arrow);
                i += 2;
                if bytes.get(i) == Some(&b'>') {
                    i += 1;
                }
            }
            c if c.is_ascii_whitespace() => {
                i += 1;
            }
            _ => {
                let start = i;
                while i < bytes.len() && !at_boundary(bytes, i) {
                    i += 1;
                }
                tokens.push(Token::Ident(input[start..i].to_string()));
            }
        }
    }
    tokens
}

fn at_boundary(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b',' | b'(' | b')' | b':' => true,
        b'-' => bytes.get(i + 1) == Some(&b'>'),
        c => c.is_ascii_whitespace(),
    }
}

struct Reader<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Reader<'_> {
    /// Items at one nesting level, ending at `)` or end of input
    fn items(&mut self) -> Vec<SelectItem> {
        let mut items = Vec::new();
        loop {
            if let Some(item) = self.item() {
                items.push(item);
            }
            match self.peek() {
                Some(Token::Comma) => self.pos += 1,
                _ => break,
            }
        }
        items
    }

    /// One item: `[alias ':'] name ['(' items ')']`. JSON paths and
    /// trailing qualifiers after the name are discarded.
    fn item(&mut self) -> Option<SelectItem> {
        let mut alias: Option<String> = None;
        let mut name: Option<String> = None;
        let mut children: Option<Vec<SelectItem>> = None;

        loop {
            match self.peek() {
                Some(Token::Comma) | Some(Token::RParen) | None => break,
                Some(Token::Colon) => {
                    self.pos += 1;
                    // Only the substring after the first `:` is the
                    // effective identifier; the alias is not validated.
                    if alias.is_none() {
                        alias = name.take();
                    }
                }
                Some(Token::Arrow) => {
                    // JSON path suffix: the column is what came before
                    self.pos += 1;
                }
                Some(Token::LParen) => {
                    self.pos += 1;
                    children = Some(self.items());
                    if matches!(self.peek(), Some(Token::RParen)) {
                        self.pos += 1;
                    }
                }
                Some(Token::Ident(text)) => {
                    // First identifier names the item; later ones are
                    // JSON path segments or trailing qualifiers.
                    if name.is_none() && children.is_none() {
                        name = Some(text.clone());
                    }
                    self.pos += 1;
                }
            }
        }

        let node = match (name, children) {
            (Some(name), Some(items)) => SelectNode::Relation {
                name: strip_modifier(&name),
                items,
            },
            (Some(name), None) => SelectNode::Column(normalize_column(&name)),
            (None, _) => return None,
        };
        Some(SelectItem { alias, node })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }
}

/// Normalize a raw column token: drop the required-join modifier and any
/// dotted qualifier. `*` passes through untouched.
fn normalize_column(raw: &str) -> String {
    let stripped = strip_modifier(raw);
    stripped.split('.').next().unwrap_or_default().to_string()
}

fn strip_modifier(raw: &str) -> String {
    raw.replace(INNER_MODIFIER, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> SelectItem {
        SelectItem {
            alias: None,
            node: SelectNode::Column(name.to_string()),
        }
    }

    #[test]
    fn test_plain_columns() {
        let items = parse_select_list("id, name, created_at");
        assert_eq!(items, vec![column("id"), column("name"), column("created_at")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_select_list("").is_empty());
        assert!(parse_select_list("   ").is_empty());
    }

    #[test]
    fn test_wildcard_survives() {
        let items = parse_select_list("*");
        assert_eq!(items, vec![column("*")]);
    }

    #[test]
    fn test_relation_is_not_split() {
        let items = parse_select_list("id, profiles(username, avatar_url)");
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[1].node,
            SelectNode::Relation {
                name: "profiles".to_string(),
                items: vec![column("username"), column("avatar_url")],
            }
        );
    }

    #[test]
    fn test_alias_is_captured_but_separate() {
        let items = parse_select_list("owner:profiles(username)");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].alias.as_deref(), Some("owner"));
        assert_eq!(
            items[0].node,
            SelectNode::Relation {
                name: "profiles".to_string(),
                items: vec![column("username")],
            }
        );
    }

    #[test]
    fn test_aliased_column() {
        let items = parse_select_list("display:name");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].alias.as_deref(), Some("display"));
        assert_eq!(items[0].node, SelectNode::Column("name".to_string()));
    }

    #[test]
    fn test_inner_modifier_is_stripped() {
        let items = parse_select_list("profiles!inner(username)");
        assert_eq!(
            items[0].node,
            SelectNode::Relation {
                name: "profiles".to_string(),
                items: vec![column("username")],
            }
        );
    }

    #[test]
    fn test_json_path_is_stripped() {
        let items = parse_select_list("data->meta, settings->>theme");
        assert_eq!(items, vec![column("data"), column("settings")]);
    }

    #[test]
    fn test_dotted_qualifier_is_stripped() {
        let items = parse_select_list("address.city");
        assert_eq!(items, vec![column("address")]);
    }

    #[test]
    fn test_nested_relations() {
        let items = parse_select_list("styles:building_styles(style:architectural_styles(id, name))");
        let SelectNode::Relation { name, items: inner } = &items[0].node else {
            panic!("expected relation");
        };
        assert_eq!(name, "building_styles");
        let SelectNode::Relation { name, items: leaf } = &inner[0].node else {
            panic!("expected nested relation");
        };
        assert_eq!(name, "architectural_styles");
        assert_eq!(leaf, &vec![column("id"), column("name")]);
    }

    #[test]
    fn test_multiline_list() {
        let items = parse_select_list("\n    id,\n    name,\n    profiles(username)\n  ");
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_stray_commas_yield_no_items() {
        let items = parse_select_list("id,, name,");
        assert_eq!(items, vec![column("id"), column("name")]);
    }
}
