/// Typed CSS selectors used by the site heuristics.
///
/// A selector is a comma-separated list of compound selectors, each made of an
/// optional tag, id, class and one attribute test. `to_css` renders it for the
/// browser's native `closest`/`querySelectorAll`; `matches` evaluates it in Rust
/// against any [`DomNode`].

use crate::dom::DomNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrTest {
    /// `[name]`
    Present(&'static str),
    /// `[name='value']`
    Equals(&'static str, &'static str),
    /// `[name*='value']`
    Contains(&'static str, &'static str),
}

impl AttrTest {
    fn name(&self) -> &'static str {
        match self {
            AttrTest::Present(name) | AttrTest::Equals(name, _) | AttrTest::Contains(name, _) => name,
        }
    }

    fn accepts(&self, value: &str) -> bool {
        match self {
            AttrTest::Present(_) => true,
            AttrTest::Equals(_, expected) => value == *expected,
            AttrTest::Contains(_, needle) => !needle.is_empty() && value.contains(needle),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compound {
    tag: Option<&'static str>,
    id: Option<&'static str>,
    class: Option<&'static str>,
    attr: Option<AttrTest>,
}

impl Compound {
    const EMPTY: Compound = Compound {
        tag: None,
        id: None,
        class: None,
        attr: None,
    };

    pub const fn tag(tag: &'static str) -> Self {
        Compound {
            tag: Some(tag),
            ..Self::EMPTY
        }
    }

    pub const fn id(id: &'static str) -> Self {
        Compound {
            id: Some(id),
            ..Self::EMPTY
        }
    }

    pub const fn class(class: &'static str) -> Self {
        Compound {
            class: Some(class),
            ..Self::EMPTY
        }
    }

    pub const fn attr(test: AttrTest) -> Self {
        Compound {
            attr: Some(test),
            ..Self::EMPTY
        }
    }

    pub const fn with_id(self, id: &'static str) -> Self {
        Compound {
            tag: self.tag,
            id: Some(id),
            class: self.class,
            attr: self.attr,
        }
    }

    pub const fn with_attr(self, test: AttrTest) -> Self {
        Compound {
            tag: self.tag,
            id: self.id,
            class: self.class,
            attr: Some(test),
        }
    }

    fn matches<N: DomNode>(&self, node: &N) -> bool {
        if let Some(tag) = self.tag {
            if !node.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = self.id {
            if node.id() != id {
                return false;
            }
        }
        if let Some(class) = self.class {
            if !node.class_name().split_whitespace().any(|c| c == class) {
                return false;
            }
        }
        if let Some(test) = self.attr {
            match node.attribute(test.name()) {
                Some(value) if test.accepts(&value) => {}
                _ => return false,
            }
        }
        true
    }

    fn write_css(&self, out: &mut String) {
        if let Some(tag) = self.tag {
            out.push_str(tag);
        }
        if let Some(id) = self.id {
            out.push('#');
            out.push_str(id);
        }
        if let Some(class) = self.class {
            out.push('.');
            out.push_str(class);
        }
        match self.attr {
            Some(AttrTest::Present(name)) => out.push_str(&format!("[{}]", name)),
            Some(AttrTest::Equals(name, value)) => out.push_str(&format!("[{}='{}']", name, value)),
            Some(AttrTest::Contains(name, value)) => out.push_str(&format!("[{}*='{}']", name, value)),
            None => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector(&'static [Compound]);

impl Selector {
    pub const fn new(alternatives: &'static [Compound]) -> Self {
        Selector(alternatives)
    }

    pub fn matches<N: DomNode>(&self, node: &N) -> bool {
        self.0.iter().any(|compound| compound.matches(node))
    }

    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (i, compound) in self.0.iter().enumerate() {
            if i > 0 {
                css.push_str(", ");
            }
            compound.write_css(&mut css);
        }
        css
    }
}
