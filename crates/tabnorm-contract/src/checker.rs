use tabnorm_model::ScriptDialect;

use crate::patterns::{self, EntryMatch};
use crate::policy::ContractPolicy;
use crate::violation::ContractViolation;

/// Checks generated programs against the structural and safety contract.
#[derive(Debug, Clone)]
pub struct ContractChecker {
    dialect: ScriptDialect,
    policy: ContractPolicy,
}

impl ContractChecker {
    pub fn new(dialect: ScriptDialect, policy: ContractPolicy) -> Self {
        Self { dialect, policy }
    }

    /// Checker with the built-in policy of `dialect`.
    pub fn for_dialect(dialect: ScriptDialect) -> Self {
        Self::new(dialect, ContractPolicy::for_dialect(dialect))
    }

    pub fn dialect(&self) -> ScriptDialect {
        self.dialect
    }

    pub fn policy(&self) -> &ContractPolicy {
        &self.policy
    }

    /// Run every rule and return all violations; empty means acceptable.
    pub fn check(&self, program: &str) -> Vec<ContractViolation> {
        if program.trim().is_empty() {
            return vec![ContractViolation::EmptyProgram];
        }

        let mut violations = Vec::new();

        let bytes = program.len();
        if bytes > self.policy.max_bytes {
            violations.push(ContractViolation::TooLarge {
                bytes,
                max_bytes: self.policy.max_bytes,
            });
        }

        match patterns::find_entry(self.dialect, program) {
            EntryMatch::Missing => violations.push(ContractViolation::MissingEntryRoutine {
                signature: self.dialect.entry_signature().to_string(),
            }),
            EntryMatch::Found(Some(found)) if found != 2 => {
                violations.push(ContractViolation::EntryArity { found });
            }
            EntryMatch::Found(_) => {}
        }

        match patterns::find_guard(self.dialect, program) {
            None => violations.push(ContractViolation::MissingGuard),
            Some(guard_end) => {
                if !patterns::has_invocation(self.dialect, &program[guard_end..]) {
                    violations.push(ContractViolation::MissingGuardInvocation {
                        expected: patterns::expected_invocation(self.dialect).to_string(),
                    });
                }
            }
        }

        for rule in &self.policy.denylist {
            if rule.matches(program) {
                violations.push(ContractViolation::ForbiddenToken {
                    token: rule.token.clone(),
                    category: rule.category,
                });
            }
        }

        violations
    }

    /// Convenience wrapper returning display messages.
    pub fn check_messages(&self, program: &str) -> Vec<String> {
        self.check(program)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    pub fn is_acceptable(&self, program: &str) -> bool {
        self.check(program).is_empty()
    }
}
