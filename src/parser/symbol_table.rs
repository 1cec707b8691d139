use std::fmt;

use ordermap::OrderMap;

/// Base types of the language. Only `int` exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
        }
    }
}

/// One declared identifier. Created when the declaration is recognized and
/// never mutated afterwards. `size` is `None` for arrays declared without an
/// explicit element count (`int v[] = {...};`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub is_array: bool,
    pub size: Option<usize>,
}

impl Symbol {
    pub fn scalar(name: String) -> Self {
        Self {
            name,
            ty: Type::Int,
            is_array: false,
            size: None,
        }
    }

    pub fn array(name: String, size: Option<usize>) -> Self {
        Self {
            name,
            ty: Type::Int,
            is_array: true,
            size,
        }
    }

    /// `int`, `int[N]` or `int[]`.
    pub fn type_annotation(&self) -> String {
        if self.is_array {
            match self.size {
                Some(size) => format!("{}[{}]", self.ty, size),
                None => format!("{}[]", self.ty),
            }
        } else {
            self.ty.to_string()
        }
    }
}

/// Declaration registry for one parse session. Entries keep declaration
/// order so the end-of-parse dump is deterministic.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: OrderMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new symbol.
    ///
    /// # Panics
    ///
    /// Panics if `symbol.name` is already declared; callers must check with
    /// [`exists`](Self::exists) first. An existing entry is never overwritten.
    pub fn declare(&mut self, symbol: Symbol) {
        assert!(
            !self.entries.contains_key(&symbol.name),
            "symbol `{}` is already declared",
            symbol.name
        );
        self.entries.insert(symbol.name.clone(), symbol);
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Symbol table:\n");
        for (name, symbol) in &self.entries {
            out.push_str(&format!("  {} -> {}\n", name, symbol.type_annotation()));
        }
        out
    }

    pub fn print_table(&self) {
        print!("{}", self.render());
    }
}
