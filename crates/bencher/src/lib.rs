use criterion::{BatchSize, BenchmarkId, Throughput};

/// One benchmark input: a captured wire payload plus how heavy it is to process.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, file: TestFile) -> Self {
        Self { name, group, file }
    }

    pub fn small(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Small, file)
    }

    pub fn large(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Large, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    /// `<group>/<name>`, so reports sort small inputs apart from large ones.
    pub fn id(&self) -> BenchmarkId {
        BenchmarkId::new(self.group.label(), self.name)
    }

    pub fn throughput(&self) -> Throughput {
        Throughput::Bytes(self.file.len() as u64)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A single streamed message versus a whole timeline page.
#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Large,
}

impl TestGroup {
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Large => "large",
        }
    }

    pub fn batch_size(self) -> BatchSize {
        match self {
            Self::Small => BatchSize::SmallInput,
            Self::Large => BatchSize::LargeInput,
        }
    }

    /// Large inputs take long enough per iteration that fewer samples suffice.
    pub fn sample_size(self) -> usize {
        match self {
            Self::Small => 100,
            Self::Large => 20,
        }
    }
}
