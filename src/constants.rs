//! # Constants
//!
//! Well-known names, labels and defaults shared across the operator.

/// Operator name, used as field manager and in log/metric identifiers
pub const OPERATOR_NAME: &str = "splunk-token-operator";

/// Finalizer guarding remote HEC token cleanup
pub const TOKEN_FINALIZER: &str = "splunktoken.managed.openshift.io/finalizer";

/// Name of the SplunkToken object created in every ClusterDeployment namespace
pub const TOKEN_OBJECT_NAME: &str = "cluster";

/// Name of the Secret holding the generated `outputs.conf`
pub const TOKEN_SECRET_NAME: &str = "splunk-hec-token";

/// Secret data key for the generated Splunk forwarder configuration
pub const SECRET_DATA_KEY: &str = "outputs.conf";

/// Name of the SyncSet that pushes the token Secret to the managed cluster
pub const SYNC_SET_NAME: &str = "splunk-hec-token";

/// Namespace on the managed cluster receiving the token Secret
pub const SYNC_TARGET_NAMESPACE: &str = "openshift-security";

/// Name of the token Secret on the managed cluster
pub const SYNC_TARGET_SECRET_NAME: &str = "splunk-hec-token";

/// ClusterDeployment label carrying the cluster's external ID
pub const CLUSTER_ID_LABEL: &str = "api.openshift.com/id";

/// ClusterDeployment label distinguishing hosted control plane management clusters
pub const CLUSTER_TYPE_LABEL: &str = "ext-hypershift.openshift.io/cluster-type";

/// Value of [`CLUSTER_TYPE_LABEL`] selecting the management cluster index configuration
pub const MANAGEMENT_CLUSTER_TYPE: &str = "management-cluster";

/// Default domain of the Splunk Cloud HEC ingestion endpoints
pub const DEFAULT_COLLECTOR_DOMAIN: &str = "splunkcloud.com";

/// Default path of the operator configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/splunk-token-operator/config.yaml";

/// Default HTTP server port for metrics and probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default server startup timeout in seconds
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default server readiness poll interval in milliseconds
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// Default deadline for a single reconcile pass in seconds
pub const DEFAULT_RECONCILE_TIMEOUT_SECS: u64 = 60;

/// Default timeout for a single ACS request in seconds
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default requeue delay after a failed reconcile pass in seconds
pub const DEFAULT_ERROR_REQUEUE_SECS: u64 = 60;

/// Default resync interval for converged objects in seconds (10 hours)
pub const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 36_000;
