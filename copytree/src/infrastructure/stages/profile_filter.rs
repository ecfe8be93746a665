// /////////////////////////////////////////////////////////////////////////////
// CopyTree
// Copyright (c) 2025 CopyTree Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # ProfileFilterStage
//!
//! Spec §4.8: applies the profile's include/exclude glob lists using the
//! ignore matcher's single-pattern `matches_glob` entry point. The
//! `always` block passes through this stage unchanged (that policing is
//! `RulesetFilterStage`'s job, since both stages share the same
//! always-include/always-exclude lists per spec §4.1's decision order).

use async_trait::async_trait;
use copytree_domain::aggregates::WorkingSet;
use copytree_domain::error::CopyTreeResult;
use copytree_domain::profile::Profile;
use copytree_domain::repositories::Stage;
use copytree_domain::services::matches_glob;
use copytree_domain::RunContext;

pub struct ProfileFilterStage {
    pub profile: Profile,
}

impl ProfileFilterStage {
    pub fn new(profile: Profile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl Stage for ProfileFilterStage {
    fn name(&self) -> &str {
        "ProfileFilter"
    }

    async fn process(&self, mut input: WorkingSet, _context: &RunContext) -> CopyTreeResult<WorkingSet> {
        let always_include = &self.profile.always_include;
        let always_exclude = &self.profile.always_exclude;

        let mut retained_errors = None;
        input.retain(|file| {
            let path = file.relative_path().as_str();

            if always_exclude.iter().any(|glob| matches_glob(glob, path).unwrap_or(false)) {
                return false;
            }
            if always_include.iter().any(|glob| matches_glob(glob, path).unwrap_or(false)) {
                return true;
            }
            if self.profile.exclude.iter().any(|glob| match matches_glob(glob, path) {
                Ok(matched) => matched,
                Err(err) => {
                    retained_errors.get_or_insert(err);
                    false
                }
            }) {
                return false;
            }
            if self.profile.include.is_empty() {
                return true;
            }
            self.profile.include.iter().any(|glob| matches_glob(glob, path).unwrap_or(false))
        });

        if let Some(err) = retained_errors {
            return Err(err);
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copytree_domain::entities::FileEntry;
    use copytree_domain::value_objects::RelativePath;

    fn file(path: &str) -> FileEntry {
        FileEntry::discovered(RelativePath::new(path), path.into(), 10, Utc::now())
    }

    fn context() -> RunContext {
        super::super::test_support::null_context(std::env::temp_dir())
    }

    #[tokio::test]
    async fn include_globs_narrow_the_working_set() {
        let profile = Profile {
            include: vec!["**/*.py".to_string()],
            ..Profile::empty()
        };
        let stage = ProfileFilterStage::new(profile);
        let input = WorkingSet::new(vec![file("src/m.py"), file("src/m.pyc"), file("tests/t.py")]);
        let output = stage.process(input, &context()).await.unwrap();
        let paths: Vec<&str> = output.files().iter().map(|f| f.relative_path().as_str()).collect();
        assert_eq!(paths, vec!["src/m.py", "tests/t.py"]);
    }

    #[tokio::test]
    async fn always_exclude_wins_over_always_include() {
        let profile = Profile {
            always_include: vec!["secrets/**".to_string()],
            always_exclude: vec!["secrets/key.pem".to_string()],
            ..Profile::empty()
        };
        let stage = ProfileFilterStage::new(profile);
        let input = WorkingSet::new(vec![file("secrets/key.pem")]);
        let output = stage.process(input, &context()).await.unwrap();
        assert!(output.is_empty());
    }
}
