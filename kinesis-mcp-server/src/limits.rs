//! Kinesis Data Streams service limits and defaults enforced before dispatch.

pub const DEFAULT_REGION: &str = "us-west-2";

pub const MIN_REGION_LENGTH: usize = 1;
pub const MAX_REGION_LENGTH: usize = 64;

pub const MIN_STREAM_NAME_LENGTH: usize = 1;
pub const MAX_STREAM_NAME_LENGTH: usize = 128;
pub const MIN_ARN_LENGTH: usize = 1;
pub const MAX_ARN_LENGTH: usize = 2048;

pub const MIN_SHARD_ID_LENGTH: usize = 1;
pub const MAX_SHARD_ID_LENGTH: usize = 128;
pub const MIN_SHARD_ITERATOR_LENGTH: usize = 1;
pub const MAX_SHARD_ITERATOR_LENGTH: usize = 512;

pub const MIN_RECORDS: usize = 1;
pub const MAX_RECORDS: usize = 500;
pub const MIN_PARTITION_KEY_LENGTH: usize = 1;
pub const MAX_PARTITION_KEY_LENGTH: usize = 256;
pub const MAX_EXPLICIT_HASH_KEY_LENGTH: usize = 128;

pub const MIN_SHARDS_PER_STREAM: i64 = 1;
pub const MAX_SHARDS_PER_STREAM: i64 = 500;
pub const DEFAULT_SHARD_COUNT: i64 = 1;
pub const MIN_TARGET_SHARD_COUNT: i64 = 1;
pub const MAX_TARGET_SHARD_COUNT: i64 = 10_000;

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 10_000;
pub const DEFAULT_GET_RECORDS_LIMIT: i64 = 10_000;
pub const DEFAULT_DESCRIBE_STREAM_LIMIT: i64 = 100;
pub const MAX_LIST_STREAMS_LIMIT: i64 = 100;
pub const DEFAULT_LIST_STREAMS_LIMIT: i64 = 100;
pub const DEFAULT_LIST_SHARDS_MAX_RESULTS: i64 = 1000;
pub const DEFAULT_LIST_CONSUMERS_MAX_RESULTS: i64 = 100;
pub const MAX_LIST_TAGS_LIMIT: i64 = 50;

pub const MIN_RETENTION_HOURS: i64 = 24;
pub const MAX_RETENTION_HOURS: i64 = 8760;

pub const MIN_NEXT_TOKEN_LENGTH: usize = 1;
pub const MAX_NEXT_TOKEN_LENGTH: usize = 1_048_576;

pub const MAX_TAGS_COUNT: usize = 50;
pub const MIN_TAG_KEYS: usize = 1;
pub const MAX_TAG_KEYS: usize = 50;
pub const MIN_TAG_KEY_LENGTH: usize = 1;
pub const MAX_TAG_KEY_LENGTH: usize = 128;
pub const MIN_TAG_VALUE_LENGTH: usize = 0;
pub const MAX_TAG_VALUE_LENGTH: usize = 256;

pub const MIN_KEY_ID_LENGTH: usize = 1;
pub const MAX_KEY_ID_LENGTH: usize = 2048;
pub const DEFAULT_KEY_ID: &str = "alias/aws/kinesis";

pub const MIN_SHARD_LEVEL_METRICS: usize = 1;
pub const MAX_SHARD_LEVEL_METRICS: usize = 7;

pub const MIN_POLICY_LENGTH: usize = 1;
pub const MAX_POLICY_LENGTH: usize = 20_480;

pub const MIN_CONSUMER_NAME_LENGTH: usize = 1;
pub const MAX_CONSUMER_NAME_LENGTH: usize = 128;

pub const STREAM_MODES: &[&str] = &["ON_DEMAND", "PROVISIONED"];
pub const STREAM_MODE_ON_DEMAND: &str = "ON_DEMAND";
pub const STREAM_MODE_PROVISIONED: &str = "PROVISIONED";

pub const SHARD_ITERATOR_TYPES: &[&str] = &[
    "AT_SEQUENCE_NUMBER",
    "AFTER_SEQUENCE_NUMBER",
    "TRIM_HORIZON",
    "LATEST",
    "AT_TIMESTAMP",
];

pub const SCALING_TYPES: &[&str] = &["UNIFORM_SCALING"];
pub const ENCRYPTION_TYPES: &[&str] = &["KMS"];

pub const SHARD_LEVEL_METRICS: &[&str] = &[
    "IncomingBytes",
    "IncomingRecords",
    "OutgoingBytes",
    "OutgoingRecords",
    "WriteProvisionedThroughputExceeded",
    "ReadProvisionedThroughputExceeded",
    "IteratorAgeMilliseconds",
    "ALL",
];
