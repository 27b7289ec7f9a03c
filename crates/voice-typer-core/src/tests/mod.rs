mod hotkey;
mod indicator;
mod protocol;
mod supervisor;
