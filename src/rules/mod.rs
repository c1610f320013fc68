/*!
# Rules

Descriptor table and user configuration of the consolidation rules.

## Configuration Example

```toml
active_profile = "default"

[rules.MRG001]
enabled = true
severity = "warning"

[rules.MRG005]
enabled = false

[settings]
max_fix_iterations = 16
worker_threads = 4
```
*/

pub mod builtin;
pub mod config;

pub use builtin::BuiltinRules;
pub use config::{GlobalSettings, RuleConfig, RuleProfile, RulesConfig};
