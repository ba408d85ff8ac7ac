use serde::Serialize;

/// A paragraph is its ordered list of sentences.
pub type Paragraph = Vec<String>;

/// Position in a similarity matrix: (source span index, target span index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coordinate {
    pub source: usize,
    pub target: usize,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate {
        source: 0,
        target: 0,
    };

    pub const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }

    pub(crate) fn offset(self, source: usize, target: usize) -> Self {
        Self::new(self.source + source, self.target + target)
    }

    pub(crate) fn manhattan_distance(self, other: Coordinate) -> usize {
        self.source.abs_diff(other.source) + self.target.abs_diff(other.target)
    }
}

/// Cardinality of an alignment node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// One aligned group: ordered source indices against ordered target indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentNode {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
}

impl AlignmentNode {
    pub fn new(source: Vec<usize>, target: Vec<usize>) -> Self {
        Self { source, target }
    }

    pub fn singleton(at: Coordinate) -> Self {
        Self::new(vec![at.source], vec![at.target])
    }

    pub fn shape(&self) -> NodeShape {
        match (self.source.len() > 1, self.target.len() > 1) {
            (false, false) => NodeShape::OneToOne,
            (false, true) => NodeShape::OneToMany,
            (true, false) => NodeShape::ManyToOne,
            (true, true) => NodeShape::ManyToMany,
        }
    }
}

/// Ordered, non-crossing sequence of alignment nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AlignmentPath {
    pub nodes: Vec<AlignmentNode>,
}

impl AlignmentPath {
    pub fn new(nodes: Vec<AlignmentNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AlignmentNode> {
        self.nodes.iter()
    }

    /// Sentences of every grouped paragraph, concatenated per side.
    ///
    /// Indices that fall outside the given paragraph lists are skipped.
    pub fn aligned_paragraphs(
        &self,
        source: &[Paragraph],
        target: &[Paragraph],
    ) -> Vec<AlignedParagraphs> {
        self.nodes
            .iter()
            .map(|node| AlignedParagraphs {
                source: merge_paragraphs(source, &node.source),
                target: merge_paragraphs(target, &node.target),
            })
            .collect()
    }

    /// Grouped sentences joined with a single space per side.
    pub fn aligned_sentences(&self, source: &[String], target: &[String]) -> Vec<AlignedSentences> {
        self.nodes
            .iter()
            .map(|node| AlignedSentences {
                source: join_sentences(source, &node.source),
                target: join_sentences(target, &node.target),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a AlignmentPath {
    type Item = &'a AlignmentNode;
    type IntoIter = std::slice::Iter<'a, AlignmentNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedParagraphs {
    pub source: Paragraph,
    pub target: Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedSentences {
    pub source: String,
    pub target: String,
}

/// Sentence alignment inside one aligned paragraph group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphPairAlignment {
    pub paragraph_node: AlignmentNode,
    pub source_sentences: Vec<String>,
    pub target_sentences: Vec<String>,
    pub sentence_path: AlignmentPath,
}

impl ParagraphPairAlignment {
    pub fn aligned_sentences(&self) -> Vec<AlignedSentences> {
        self.sentence_path
            .aligned_sentences(&self.source_sentences, &self.target_sentences)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DocumentAlignment {
    pub paragraph_path: AlignmentPath,
    pub paragraph_pairs: Vec<ParagraphPairAlignment>,
}

fn merge_paragraphs(paragraphs: &[Paragraph], indices: &[usize]) -> Paragraph {
    indices
        .iter()
        .filter_map(|&idx| paragraphs.get(idx))
        .flat_map(|paragraph| paragraph.iter().cloned())
        .collect()
}

fn join_sentences(sentences: &[String], indices: &[usize]) -> String {
    indices
        .iter()
        .filter_map(|&idx| sentences.get(idx))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
