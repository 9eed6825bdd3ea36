use crate::config::Config;
use crate::host::HostCommand;

pub enum AddonEvent {
    /// A line from the host signal source was parsed into a command.
    Host(HostCommand),
    /// One game tick elapsed; refresh the session flags and the banner.
    Tick,
    /// The config file changed on disk and was successfully re-parsed.
    ConfigReloaded(Config),
    /// Ctrl+C received or the host quit; write final status and exit.
    Shutdown,
}
