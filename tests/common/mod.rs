#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub const FOO_JOB: &str = "\
package com.acme.jobs;

import org.quartz.JobExecutionContext;

public class Foo implements org.quartz.Job {
    public void execute(JobExecutionContext ctx) {
    }
}
";
