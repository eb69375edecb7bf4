use async_trait::async_trait;
use pretty_assertions::assert_eq;
use stmtcache::prelude::*;

/// Always reports the same readings; fails on the listed executions.
struct Fixed {
    timings: Timings,
    fail_on: Vec<usize>,
    count: usize,
}

#[async_trait]
impl Workload for Fixed {
    async fn execute(&mut self) -> StmtCacheResult<Timings> {
        self.count += 1;
        if self.fail_on.contains(&self.count) {
            return Err(StmtCacheError::Execution("connection reset by peer".into()));
        }
        Ok(self.timings)
    }

    async fn close(self) -> StmtCacheResult<()> {
        Ok(())
    }
}

fn fixed(fail_on: Vec<usize>) -> Fixed {
    Fixed {
        timings: Timings {
            core_driver: Elapsed::Micros(2000),
            network_io: Elapsed::Micros(500),
            server: Elapsed::Micros(1500),
            application: Elapsed::Millis(3),
        },
        fail_on,
        count: 0,
    }
}

fn run_config(executions: usize) -> RunConfig {
    RunConfig {
        executions,
        delay_ms: 0,
        ..RunConfig::default()
    }
}

#[tokio::test]
async fn test_table_report_for_disabled_cache() {
    let config = run_config(2);
    let outcome = RunDriver::new(&config)
        .run(CacheCapacity::DISABLED, &mut fixed(vec![]))
        .await
        .unwrap();

    let report = format_run(&outcome, true);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "# Statements cache disabled");
    assert_eq!(
        lines[1],
        "Fetch Person record nr 1  | Core driver 2.000 ms | Network IO 0.500 ms | Server 1.500 ms | Application 3.000 ms"
    );
    assert!(lines[2].starts_with("Fetch Person record nr 2"));
    assert!(lines[4].ends_with(">> TOTAL 14.000 ms"));
    assert_eq!(lines.len(), 6);
}

#[tokio::test]
async fn test_details_flag_hides_individual_lines() {
    let config = run_config(3);
    let outcome = RunDriver::new(&config)
        .run(CacheCapacity(25), &mut fixed(vec![]))
        .await
        .unwrap();

    let report = format_run(&outcome, false);
    assert!(report.starts_with("# Statements cache 25\n---"));
    assert!(!report.contains("nr 1"));
    assert!(report.contains(">> TOTAL 21.000 ms"));
}

#[tokio::test]
async fn test_failed_executions_are_counted_not_summed() {
    let config = run_config(4);
    let outcome = RunDriver::new(&config)
        .run(CacheCapacity(25), &mut fixed(vec![2, 4]))
        .await
        .unwrap();

    assert_eq!(outcome.records.len(), 2);
    let report = format_run(&outcome, false);
    assert!(report.contains("2 failed execution(s) excluded"));
    assert!(report.contains(">> TOTAL 14.000 ms"));
}

#[tokio::test]
async fn test_json_report() {
    let config = run_config(1);
    let outcome = RunDriver::new(&config)
        .run(CacheCapacity(25), &mut fixed(vec![]))
        .await
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&RunReport::from(&outcome).to_json().unwrap()).unwrap();
    assert_eq!(json["cache"], 25);
    assert_eq!(json["totals"]["total_micros"], 7000);
    assert_eq!(json["executions"][0]["label"], "Fetch Person record nr 1");
    assert_eq!(json["executions"][0]["samples"][3]["kind"], "application_time");
    assert_eq!(json["executions"][0]["samples"][3]["value_micros"], 3000);
    assert_eq!(json["failed"].as_array().unwrap().len(), 0);
}
