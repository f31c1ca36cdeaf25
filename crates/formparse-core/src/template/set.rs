//! Picking the template that fits a text.

use tracing::debug;

use super::Template;

/// Ordered collection of templates; the first accepting template wins.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, template: Template) {
        self.templates.push(template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Template> {
        self.templates.iter_mut()
    }

    /// First template, in insertion order, whose acceptance tests pass.
    pub fn find_accepting(&mut self, text: &str) -> Option<&mut Template> {
        self.find_where(text, |_| true)
    }

    /// Like [`find_accepting`](Self::find_accepting), restricted to one group.
    pub fn find_accepting_in_group(&mut self, group: &str, text: &str) -> Option<&mut Template> {
        self.find_where(text, |t| t.group() == group)
    }

    fn find_where(&mut self, text: &str, filter: impl Fn(&Template) -> bool) -> Option<&mut Template> {
        let index = self
            .templates
            .iter_mut()
            .position(|t| filter(&*t) && t.accepts(text))?;
        debug!("Selected template '{}'", self.templates[index].name());
        Some(&mut self.templates[index])
    }
}

impl FromIterator<Template> for TemplateSet {
    fn from_iter<T: IntoIterator<Item = Template>>(iter: T) -> Self {
        Self {
            templates: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TemplateSet {
    type Item = Template;
    type IntoIter = std::vec::IntoIter<Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.into_iter()
    }
}
