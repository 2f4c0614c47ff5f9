use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StagingType {
    Initial,
    Final,
}

impl fmt::Display for StagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagingType::Initial => write!(f, "initial"),
            StagingType::Final => write!(f, "final"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStagingTypeError(pub String);

impl fmt::Display for ParseStagingTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid staging step type: '{}'. Valid values are: initial, final",
            self.0
        )
    }
}

impl std::error::Error for ParseStagingTypeError {}

impl FromStr for StagingType {
    type Err = ParseStagingTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(StagingType::Initial),
            "final" => Ok(StagingType::Final),
            _ => Err(ParseStagingTypeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum WorkflowType {
    #[default]
    Core,
    Topology,
    Federation,
    Plugin,
    Unit,
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowType::Core => write!(f, "CORE"),
            WorkflowType::Topology => write!(f, "TOPOLOGY"),
            WorkflowType::Federation => write!(f, "FEDERATION"),
            WorkflowType::Plugin => write!(f, "PLUGIN"),
            WorkflowType::Unit => write!(f, "UNIT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWorkflowTypeError(pub String);

impl fmt::Display for ParseWorkflowTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid workflow type: '{}'. Valid values are: CORE, TOPOLOGY, FEDERATION, PLUGIN, UNIT",
            self.0
        )
    }
}

impl std::error::Error for ParseWorkflowTypeError {}

impl FromStr for WorkflowType {
    type Err = ParseWorkflowTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CORE" => Ok(WorkflowType::Core),
            "TOPOLOGY" => Ok(WorkflowType::Topology),
            "FEDERATION" => Ok(WorkflowType::Federation),
            "PLUGIN" => Ok(WorkflowType::Plugin),
            "UNIT" => Ok(WorkflowType::Unit),
            _ => Err(ParseWorkflowTypeError(s.to_string())),
        }
    }
}

/// A test-runner role. The spelling of each name doubles as the key used in
/// the `tests` mapping of a run request and as the driver-file prefix.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TestExecutor {
    Provider,
    ProviderSecondary,
    Consumer,
    ConsumerSecondary,
    ConsumerTertiary,
}

impl TestExecutor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestExecutor::Provider => "PROVIDER",
            TestExecutor::ProviderSecondary => "PROVIDERSECONDARY",
            TestExecutor::Consumer => "CONSUMER",
            TestExecutor::ConsumerSecondary => "CONSUMERSECONDARY",
            TestExecutor::ConsumerTertiary => "CONSUMERTERTIARY",
        }
    }

    pub fn topology_role(&self) -> TopologyRole {
        match self {
            TestExecutor::Provider | TestExecutor::ProviderSecondary => TopologyRole::Icat,
            TestExecutor::Consumer
            | TestExecutor::ConsumerSecondary
            | TestExecutor::ConsumerTertiary => TopologyRole::Resource,
        }
    }
}

impl fmt::Display for TestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTestExecutorError(pub String);

impl fmt::Display for ParseTestExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown test executor: '{}'", self.0)
    }
}

impl std::error::Error for ParseTestExecutorError {}

impl FromStr for TestExecutor {
    type Err = ParseTestExecutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROVIDER" => Ok(TestExecutor::Provider),
            "PROVIDERSECONDARY" => Ok(TestExecutor::ProviderSecondary),
            "CONSUMER" => Ok(TestExecutor::Consumer),
            "CONSUMERSECONDARY" => Ok(TestExecutor::ConsumerSecondary),
            "CONSUMERTERTIARY" => Ok(TestExecutor::ConsumerTertiary),
            _ => Err(ParseTestExecutorError(s.to_string())),
        }
    }
}

/// Which side of a topology deployment an executor exercises. Rendered
/// verbatim as the `--topology` argument in generated command lines.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TopologyRole {
    Icat,
    Resource,
}

impl TopologyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopologyRole::Icat => "icat",
            TopologyRole::Resource => "resource",
        }
    }
}

impl fmt::Display for TopologyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The requested executors and their test lists, in the order the request
/// declared them. Keys stay raw strings: an unknown executor name is skipped
/// at generation time, not rejected at decode time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestMatrix(pub Vec<(String, Vec<String>)>);

impl TestMatrix {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(executor, tests)| (executor.as_str(), tests.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'de> Deserialize<'de> for TestMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MatrixVisitor;

        impl<'de> serde::de::Visitor<'de> for MatrixVisitor {
            type Value = TestMatrix;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of executor names to test lists")
            }

            // A plain map type would lose the request's declaration order,
            // which fixes the order driver files are produced in.
            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(TestMatrix(entries))
            }
        }

        deserializer.deserialize_map(MatrixVisitor)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestData {
    #[serde(default)]
    pub tests: Option<TestMatrix>,

    #[serde(default, rename = "package-dir")]
    pub package_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunDefinition {
    pub id: i64,
    pub request_group: String,
    pub request_data: RequestData,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct JobCounts {
    #[serde(rename = "Total")]
    pub total: u64,
    #[serde(rename = "Complete")]
    pub complete: u64,
}

/// Aggregate completion counts for a request group. Groups other than
/// "Testing Jobs" may be present in the record; they are not consumed here.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RunStatus {
    #[serde(rename = "Testing Jobs")]
    pub testing_jobs: JobCounts,
}

impl RunStatus {
    pub fn fully_tested(&self) -> bool {
        self.testing_jobs.total == self.testing_jobs.complete
    }
}
