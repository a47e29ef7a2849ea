// crates/find_incomplete_functions/src/lib.rs

//! The structural pass: parse a block as Python, walk every function
//! definition and report the ones whose body has no real logic.
//!
//! Parsing is best-effort. Anything that does not parse cleanly simply
//! produces no findings; callers never see an error from this crate.

use tree_sitter::{Node, Parser};

/// Abstracts the Python parser so the walk can be driven by hand-built trees.
pub trait PythonParser {
    /// Parses `content`, returning `None` if it is not valid source.
    fn parse_content(&mut self, content: &str) -> Option<SyntaxTree>;
}

/// A lowered parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}

/// The closed set of node shapes the classifier cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    /// `def` / `async def`, at any depth.
    FunctionDefinition {
        name: String,
        /// 1-based line of the `def` header.
        line: usize,
        /// Body statements, comments excluded.
        body: Vec<SyntaxNode>,
    },
    /// A bare `pass`.
    PassPlaceholder,
    /// An expression statement that is nothing but a string literal.
    DocString,
    /// Everything else. Statement containers keep their statements so nested
    /// definitions are reachable; expressions are leaves.
    Other { children: Vec<SyntaxNode> },
}

/// Trees deeper than this are refused, as the interpreter refuses them with
/// a recursion error. Real code sits far below it.
const MAX_TREE_DEPTH: usize = 1000;

/// Node kinds whose named children can hold statements. Expression subtrees
/// are never entered, so their depth cannot grow the lowering stack.
const STATEMENT_CONTAINERS: &[&str] = &[
    "module",
    "block",
    "class_definition",
    "decorated_definition",
    "if_statement",
    "elif_clause",
    "else_clause",
    "for_statement",
    "while_statement",
    "try_statement",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "with_statement",
    "match_statement",
    "case_clause",
];

/// Python 2 statements the grammar still accepts without an error node.
const LEGACY_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// Lowers one node. `None` means the source is not valid Python 3.
fn lower(node: Node, source: &[u8]) -> Option<SyntaxNode> {
    let kind = node.kind();
    if LEGACY_STATEMENTS.contains(&kind) {
        log::debug!("python 2 {} at line {}", kind, node.start_position().row + 1);
        return None;
    }
    let lowered = match kind {
        "function_definition" => {
            let name = node
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source).ok())
                .unwrap_or("<unknown>")
                .to_string();
            let line = node.start_position().row + 1;
            let body = match node.child_by_field_name("body") {
                Some(block) => lower_children(block, source)?,
                None => Vec::new(),
            };
            SyntaxNode::FunctionDefinition { name, line, body }
        }
        "pass_statement" => SyntaxNode::PassPlaceholder,
        "expression_statement" => match statement_children(node).as_slice() {
            [only] if is_string_literal(*only, source) => SyntaxNode::DocString,
            _ => SyntaxNode::Other {
                children: Vec::new(),
            },
        },
        container if STATEMENT_CONTAINERS.contains(&container) => SyntaxNode::Other {
            children: lower_children(node, source)?,
        },
        _ => SyntaxNode::Other {
            children: Vec::new(),
        },
    };
    Some(lowered)
}

fn lower_children(node: Node, source: &[u8]) -> Option<Vec<SyntaxNode>> {
    let children = statement_children(node);
    match node.kind() {
        "module" if !lines_up(&children, Some(0)) => return None,
        "block" if !lines_up(&children, None) => return None,
        _ => {}
    }
    children
        .into_iter()
        .map(|child| lower(child, source))
        .collect()
}

/// Iterative depth check, so arbitrarily deep trees never touch the stack.
fn exceeds_depth(root: Node, limit: usize) -> bool {
    let mut cursor = root.walk();
    let mut depth = 0usize;
    loop {
        if depth > limit {
            return true;
        }
        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return false;
            }
            depth -= 1;
        }
    }
}

/// Statements that open a line must start in the same column: column 0 for
/// a module, the column of the first statement for a block. The grammar
/// accepts a dedent that matches no outer indentation level.
fn lines_up(statements: &[Node], column: Option<usize>) -> bool {
    let mut expected = column;
    let mut last_row: Option<usize> = None;
    for statement in statements {
        let start = statement.start_position();
        if last_row != Some(start.row) {
            match expected {
                Some(col) if col != start.column => {
                    log::debug!("inconsistent indentation at line {}", start.row + 1);
                    return false;
                }
                Some(_) => {}
                None => expected = Some(start.column),
            }
        }
        last_row = Some(statement.end_position().row);
    }
    true
}

/// Named children of `node`, without comments.
fn statement_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// A plain or implicitly concatenated string literal. Any f-string is an
/// expression, interpolations or not.
fn is_string_literal(node: Node, source: &[u8]) -> bool {
    match node.kind() {
        "string" => {
            let text = node.utf8_text(source).unwrap_or_default();
            let prefix = text.split(['"', '\'']).next().unwrap_or_default();
            !prefix.contains(['f', 'F'])
        }
        "concatenated_string" => statement_children(node)
            .into_iter()
            .all(|part| is_string_literal(part, source)),
        _ => false,
    }
}

/// tree-sitter backed implementation of [`PythonParser`].
pub struct TreeSitterPythonParser {
    parser: Parser,
}

impl TreeSitterPythonParser {
    pub fn new() -> Option<Self> {
        let mut parser = Parser::new();
        let lang: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        parser.set_language(&lang).ok()?;
        Some(Self { parser })
    }
}

impl PythonParser for TreeSitterPythonParser {
    fn parse_content(&mut self, content: &str) -> Option<SyntaxTree> {
        let tree = self.parser.parse(content, None)?;
        let root = tree.root_node();
        // tree-sitter recovers from errors; an error-recovered tree is not a parse.
        if root.has_error() {
            return None;
        }
        if exceeds_depth(root, MAX_TREE_DEPTH) {
            log::debug!("syntax tree deeper than {}", MAX_TREE_DEPTH);
            return None;
        }
        let root = lower(root, content.as_bytes())?;
        Some(SyntaxTree { root })
    }
}

/// Parses `content` with the tree-sitter Python grammar.
pub fn try_parse(content: &str) -> Option<SyntaxTree> {
    let Some(mut parser) = TreeSitterPythonParser::new() else {
        log::warn!("python grammar could not be loaded");
        return None;
    };
    parser.parse_content(content)
}

/// How a function body was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    Complete,
    EmptyBody,
    PlaceholderOnly,
    DocStringOnly,
}

impl Completeness {
    pub fn is_incomplete(self) -> bool {
        self != Completeness::Complete
    }
}

/// Classifies a function from the immediate shape of its body.
pub fn classify_body(body: &[SyntaxNode]) -> Completeness {
    match body {
        [] => Completeness::EmptyBody,
        [SyntaxNode::PassPlaceholder] => Completeness::PlaceholderOnly,
        [SyntaxNode::DocString] => Completeness::DocStringOnly,
        _ => Completeness::Complete,
    }
}

/// A function whose body contains no logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteFunction {
    pub name: String,
    /// 1-based line of the `def` header.
    pub line: usize,
}

/// Pre-order depth-first walk collecting every incomplete function. A
/// function's own classification never stops the walk into its body.
fn collect_incomplete(node: &SyntaxNode, found: &mut Vec<IncompleteFunction>) {
    match node {
        SyntaxNode::FunctionDefinition { name, line, body } => {
            let verdict = classify_body(body);
            log::debug!("function {} (line {}): {:?}", name, line, verdict);
            if verdict.is_incomplete() {
                found.push(IncompleteFunction {
                    name: name.clone(),
                    line: *line,
                });
            }
            for child in body {
                collect_incomplete(child, found);
            }
        }
        SyntaxNode::Other { children } => {
            for child in children {
                collect_incomplete(child, found);
            }
        }
        SyntaxNode::PassPlaceholder | SyntaxNode::DocString => {}
    }
}

/// Walks an already parsed tree.
pub fn find_incomplete_in_tree(tree: &SyntaxTree) -> Vec<IncompleteFunction> {
    let mut found = Vec::new();
    collect_incomplete(&tree.root, &mut found);
    found
}

/// Runs the structural pass with any [`PythonParser`]. A failed parse
/// yields an empty list.
pub fn find_incomplete_functions_with_parser(
    content: &str,
    parser: &mut impl PythonParser,
) -> Vec<IncompleteFunction> {
    match parser.parse_content(content) {
        Some(tree) => find_incomplete_in_tree(&tree),
        None => {
            log::debug!("block did not parse; structural pass skipped");
            Vec::new()
        }
    }
}

/// Runs the structural pass with the tree-sitter parser.
pub fn find_incomplete_functions(content: &str) -> Vec<IncompleteFunction> {
    match try_parse(content) {
        Some(tree) => find_incomplete_in_tree(&tree),
        None => {
            log::debug!("block did not parse; structural pass skipped");
            Vec::new()
        }
    }
}
